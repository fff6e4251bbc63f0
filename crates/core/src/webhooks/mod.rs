//! Webhooks module - registry, notification delivery and dispatch.

mod dispatcher;
mod memory_repository;
mod notifier;
mod webhooks_model;
mod webhooks_service;
mod webhooks_traits;


pub use dispatcher::{DispatchReport, Dispatcher};
pub use memory_repository::InMemoryWebhookRepository;
pub use notifier::{HttpWebhookNotifier, DEFAULT_DELIVERY_TIMEOUT};
pub use webhooks_model::{
    parse_webhook_id, NewWebhook, Notification, NotificationMessage, Webhook,
};
pub use webhooks_service::WebhookService;
pub use webhooks_traits::{WebhookNotifierTrait, WebhookRepositoryTrait, WebhookServiceTrait};
