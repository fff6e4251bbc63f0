use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use url::Url;

use crate::errors::{Result, ValidationError};
use crate::tracks::TrackRepositoryTrait;

use super::webhooks_model::{NewWebhook, Webhook};
use super::webhooks_traits::{WebhookRepositoryTrait, WebhookServiceTrait};

/// Registration and lookup of webhooks.
pub struct WebhookService {
    repository: Arc<dyn WebhookRepositoryTrait>,
    tracks: Arc<dyn TrackRepositoryTrait>,
}

impl WebhookService {
    pub fn new(
        repository: Arc<dyn WebhookRepositoryTrait>,
        tracks: Arc<dyn TrackRepositoryTrait>,
    ) -> Self {
        WebhookService { repository, tracks }
    }

    fn validate_url(raw: &str) -> Result<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingField("webhookURL".to_string()).into());
        }
        let parsed = Url::parse(raw).map_err(|e| {
            ValidationError::InvalidInput(format!("webhookURL '{}' is not a URL: {}", raw, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ValidationError::InvalidInput(format!(
                "webhookURL '{}' must be an absolute http(s) URL",
                raw
            ))
            .into());
        }
        Ok(raw.to_string())
    }
}

#[async_trait]
impl WebhookServiceTrait for WebhookService {
    async fn register(&self, new_webhook: NewWebhook) -> Result<Webhook> {
        let url = Self::validate_url(&new_webhook.webhook_url)?;
        let threshold = new_webhook.effective_trigger_value()?;
        let watermark = self.tracks.load_sequence_state()?.high_water;

        let webhook = self.repository.insert(&url, threshold, watermark).await?;
        info!(
            "Registered webhook {} -> {} (every {} track(s), watermark {})",
            webhook.id, webhook.webhook_url, threshold, watermark
        );
        Ok(webhook)
    }

    fn get(&self, id: &str) -> Result<Webhook> {
        self.repository.get(id)
    }

    fn list(&self) -> Result<Vec<Webhook>> {
        self.repository.list()
    }

    async fn delete(&self, id: &str) -> Result<Webhook> {
        let webhook = self.repository.delete(id).await?;
        info!("Deleted webhook {}", webhook.id);
        Ok(webhook)
    }
}
