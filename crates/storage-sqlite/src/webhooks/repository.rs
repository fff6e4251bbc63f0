use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;

use paragliding_core::errors::{Error, Result, ValidationError};
use paragliding_core::webhooks::{parse_webhook_id, Webhook, WebhookRepositoryTrait};

use super::model::WebhookDB;
use crate::counters::{self, WEBHOOKS_ISSUED};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::webhooks;

pub struct WebhookRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WebhookRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        WebhookRepository { pool, writer }
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("unknown webhook '{}'", id))
}

#[async_trait]
impl WebhookRepositoryTrait for WebhookRepository {
    fn get(&self, id: &str) -> Result<Webhook> {
        let key = parse_webhook_id(id)?;
        let mut conn = get_connection(&self.pool)?;
        webhooks::table
            .find(key as i64)
            .select(WebhookDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(Webhook::from)
            .ok_or_else(|| not_found(id))
    }

    fn list(&self) -> Result<Vec<Webhook>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = webhooks::table
            .order(webhooks::id.asc())
            .select(WebhookDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Webhook::from).collect())
    }

    async fn insert(
        &self,
        webhook_url: &str,
        min_trigger_value: u32,
        watermark: u64,
    ) -> Result<Webhook> {
        let webhook_url = webhook_url.to_string();
        let min_trigger_value = i32::try_from(min_trigger_value).map_err(|_| {
            ValidationError::InvalidInput(format!(
                "minTriggerValue {} is out of range",
                min_trigger_value
            ))
        })?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Webhook> {
                let next = counters::read(conn, WEBHOOKS_ISSUED)?.unwrap_or(0) + 1;
                let row = WebhookDB {
                    id: next,
                    webhook_url,
                    min_trigger_value,
                    watermark: watermark as i64,
                };
                let stored = diesel::insert_into(webhooks::table)
                    .values(&row)
                    .returning(WebhookDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                counters::write(conn, WEBHOOKS_ISSUED, next)?;
                Ok(Webhook::from(stored))
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<Webhook> {
        let key = parse_webhook_id(id)? as i64;
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Webhook> {
                let existing = webhooks::table
                    .find(key)
                    .select(WebhookDB::as_select())
                    .first(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| not_found(&id))?;
                diesel::delete(webhooks::table.find(key))
                    .execute(conn)
                    .into_core()?;
                Ok(Webhook::from(existing))
            })
            .await
    }

    async fn claim_due(&self, current: u64) -> Result<Vec<Webhook>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Webhook>> {
                let due: Vec<Webhook> = webhooks::table
                    .filter(webhooks::watermark.lt(current as i64))
                    .order(webhooks::id.asc())
                    .select(WebhookDB::as_select())
                    .load(conn)
                    .into_core()?
                    .into_iter()
                    .map(Webhook::from)
                    .filter(|hook| hook.is_due(current))
                    .collect();

                for hook in &due {
                    let key = parse_webhook_id(&hook.id)? as i64;
                    diesel::update(webhooks::table.find(key))
                        .set(webhooks::watermark.eq(current as i64))
                        .execute(conn)
                        .into_core()?;
                }
                if !due.is_empty() {
                    debug!("Claimed {} webhook(s) at sequence {}", due.len(), current);
                }
                Ok(due)
            })
            .await
    }
}
