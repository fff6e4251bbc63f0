//! In-memory webhook registry built on [`SequentialStore`].

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::debug;

use crate::errors::{Error, Result};
use crate::store::SequentialStore;
use crate::webhooks::webhooks_model::{parse_webhook_id, Webhook};
use crate::webhooks::webhooks_traits::WebhookRepositoryTrait;

/// Process-local webhook registry. Registrations are lost on restart.
#[derive(Default)]
pub struct InMemoryWebhookRepository {
    store: Mutex<SequentialStore<Webhook>>,
}

impl InMemoryWebhookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<MutexGuard<'_, SequentialStore<Webhook>>> {
        self.store
            .lock()
            .map_err(|_| Error::InvariantViolation("webhook registry lock poisoned".to_string()))
    }

    fn not_found(id: &str) -> Error {
        Error::NotFound(format!("unknown webhook '{}'", id))
    }
}

#[async_trait]
impl WebhookRepositoryTrait for InMemoryWebhookRepository {
    fn get(&self, id: &str) -> Result<Webhook> {
        let key = parse_webhook_id(id)?;
        self.store()?
            .get(key)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    fn list(&self) -> Result<Vec<Webhook>> {
        Ok(self.store()?.iter().map(|(_, hook)| hook.clone()).collect())
    }

    async fn insert(
        &self,
        webhook_url: &str,
        min_trigger_value: u32,
        watermark: u64,
    ) -> Result<Webhook> {
        let mut store = self.store()?;
        let key = store.high_water() + 1;
        let webhook = Webhook {
            id: key.to_string(),
            webhook_url: webhook_url.to_string(),
            min_trigger_value,
            watermark,
        };
        store.insert(key, webhook.clone())?;
        Ok(webhook)
    }

    async fn delete(&self, id: &str) -> Result<Webhook> {
        let key = parse_webhook_id(id)?;
        self.store()?
            .remove(key)
            .ok_or_else(|| Self::not_found(id))
    }

    async fn claim_due(&self, current: u64) -> Result<Vec<Webhook>> {
        let mut store = self.store()?;
        let mut claimed = Vec::new();
        for (_, hook) in store.iter_mut() {
            if hook.is_due(current) {
                claimed.push(hook.clone());
                hook.watermark = current;
            }
        }
        if !claimed.is_empty() {
            debug!("Claimed {} webhook(s) at sequence {}", claimed.len(), current);
        }
        Ok(claimed)
    }
}
