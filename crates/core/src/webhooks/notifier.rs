//! HTTP delivery of webhook notifications.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::errors::{Error, Result};

use super::webhooks_model::Notification;
use super::webhooks_traits::WebhookNotifierTrait;

/// Timeout used when none is configured.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts notifications as JSON. No retries.
pub struct HttpWebhookNotifier {
    client: Client,
}

impl Default for HttpWebhookNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_DELIVERY_TIMEOUT)
    }
}

impl HttpWebhookNotifier {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Webhook HTTP client setup failed ({}); delivering without a {:?} timeout",
                    e, timeout
                );
                Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl WebhookNotifierTrait for HttpWebhookNotifier {
    async fn deliver(&self, url: &str, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(notification)
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Delivery(format!(
                "{} answered HTTP {}",
                url,
                response.status()
            )));
        }

        debug!("Delivered {} track id(s) to {}", notification.message.tracks.len(), url);
        Ok(())
    }
}
