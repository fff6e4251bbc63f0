//! Webhooks domain models.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_TRIGGER_VALUE, MAX_MIN_TRIGGER_VALUE};
use crate::errors::{Error, Result, ValidationError};
use crate::tracks::InsertionToken;

/// Domain model representing a registered webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "minTriggerValue")]
    pub min_trigger_value: u32,
    /// Track sequence number at registration or at the last fire.
    pub watermark: u64,
}

impl Webhook {
    /// Whether enough tracks arrived since the watermark for the hook to fire.
    pub fn is_due(&self, current: u64) -> bool {
        self.watermark + u64::from(self.min_trigger_value.max(1)) <= current
    }
}

/// Parses a webhook identifier back into its registration number.
pub fn parse_webhook_id(id: &str) -> Result<u64> {
    Some(id.trim())
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| Error::NotFound(format!("unknown webhook '{}'", id)))
}

/// Input model for registering a webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWebhook {
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "minTriggerValue", default)]
    pub min_trigger_value: Option<u32>,
}

impl NewWebhook {
    /// Threshold with 0 / missing mapped to the default.
    pub fn effective_trigger_value(&self) -> Result<u32> {
        match self.min_trigger_value {
            None | Some(0) => Ok(DEFAULT_MIN_TRIGGER_VALUE),
            Some(value) if value > MAX_MIN_TRIGGER_VALUE => Err(ValidationError::InvalidInput(
                format!(
                    "minTriggerValue {} exceeds the maximum of {}",
                    value, MAX_MIN_TRIGGER_VALUE
                ),
            )
            .into()),
            Some(value) => Ok(value),
        }
    }
}

/// Body of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub t_latest: InsertionToken,
    pub tracks: Vec<String>,
    /// Time spent collecting the tracks, in milliseconds.
    pub processing: String,
}

/// Envelope posted to webhook URLs and to the clock sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "text")]
    pub message: NotificationMessage,
}
