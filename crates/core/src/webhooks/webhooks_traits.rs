use async_trait::async_trait;

use crate::errors::Result;
use crate::webhooks::webhooks_model::{NewWebhook, Notification, Webhook};

/// Trait for webhook registry persistence
#[async_trait]
pub trait WebhookRepositoryTrait: Send + Sync {
    /// Looks up a registration. Unknown ids are `Error::NotFound`.
    fn get(&self, id: &str) -> Result<Webhook>;
    fn list(&self) -> Result<Vec<Webhook>>;
    /// Registers a webhook under the next registration number.
    async fn insert(
        &self,
        webhook_url: &str,
        min_trigger_value: u32,
        watermark: u64,
    ) -> Result<Webhook>;
    async fn delete(&self, id: &str) -> Result<Webhook>;
    /// Atomically selects every webhook due at `current`, moves its watermark
    /// to `current` and returns the registrations as they were before the move.
    async fn claim_due(&self, current: u64) -> Result<Vec<Webhook>>;
}

/// Trait for webhook registry operations
#[async_trait]
pub trait WebhookServiceTrait: Send + Sync {
    async fn register(&self, new_webhook: NewWebhook) -> Result<Webhook>;
    fn get(&self, id: &str) -> Result<Webhook>;
    fn list(&self) -> Result<Vec<Webhook>>;
    async fn delete(&self, id: &str) -> Result<Webhook>;
}

/// Outbound delivery of notifications.
#[async_trait]
pub trait WebhookNotifierTrait: Send + Sync {
    async fn deliver(&self, url: &str, notification: &Notification) -> Result<()>;
}
