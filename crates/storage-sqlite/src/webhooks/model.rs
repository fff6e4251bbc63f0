//! Database models for webhooks.

use diesel::prelude::*;

use paragliding_core::webhooks::Webhook;

/// Database model for webhook registrations
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::webhooks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WebhookDB {
    pub id: i64,
    pub webhook_url: String,
    pub min_trigger_value: i32,
    pub watermark: i64,
}

impl From<WebhookDB> for Webhook {
    fn from(db: WebhookDB) -> Self {
        Self {
            id: db.id.to_string(),
            webhook_url: db.webhook_url,
            min_trigger_value: db.min_trigger_value.max(1) as u32,
            watermark: db.watermark as u64,
        }
    }
}
