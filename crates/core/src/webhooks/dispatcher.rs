//! Webhook dispatcher.
//!
//! Two triggers share the same collection logic: ingestion events (one per
//! ingested track, handled in order by the server's queue worker) and the
//! periodic clock tick that reports to a single fixed sink.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::tracks::{Track, TrackRepositoryTrait};

use super::webhooks_model::{Notification, NotificationMessage, Webhook};
use super::webhooks_traits::{WebhookNotifierTrait, WebhookRepositoryTrait};

/// Outcome of one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Webhooks whose watermark was advanced.
    pub fired: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct Dispatcher {
    tracks: Arc<dyn TrackRepositoryTrait>,
    webhooks: Arc<dyn WebhookRepositoryTrait>,
    notifier: Arc<dyn WebhookNotifierTrait>,
    clock_watermark: Mutex<u64>,
}

impl Dispatcher {
    /// Creates a dispatcher whose clock watermark starts at the current
    /// high-water mark, so the first tick only reports tracks ingested after
    /// startup.
    pub fn new(
        tracks: Arc<dyn TrackRepositoryTrait>,
        webhooks: Arc<dyn WebhookRepositoryTrait>,
        notifier: Arc<dyn WebhookNotifierTrait>,
    ) -> Result<Self> {
        let high_water = tracks.load_sequence_state()?.high_water;
        Ok(Dispatcher {
            tracks,
            webhooks,
            notifier,
            clock_watermark: Mutex::new(high_water),
        })
    }

    /// Builds the notification for live tracks with `after < seq <= upto`.
    /// `None` when every such track has been wiped.
    fn collect(&self, after: u64, upto: u64) -> Result<Option<Notification>> {
        let started = Instant::now();
        let tracks = self.tracks.list_range(after, upto, None)?;
        let Some(latest) = tracks.last() else {
            return Ok(None);
        };
        Ok(Some(Notification {
            message: NotificationMessage {
                t_latest: latest.timestamp,
                tracks: tracks.iter().map(Track::id).collect(),
                processing: started.elapsed().as_millis().to_string(),
            },
        }))
    }

    async fn deliver(&self, webhook: &Webhook, notification: &Notification) -> bool {
        match self
            .notifier
            .deliver(&webhook.webhook_url, notification)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Webhook {} delivery failed: {}", webhook.id, e);
                false
            }
        }
    }

    /// Fires every webhook due at `current`.
    ///
    /// Watermarks are advanced before anything is sent; a failed delivery is
    /// logged and not retried.
    pub async fn on_track_ingested(&self, current: u64) -> Result<DispatchReport> {
        let claimed = self.webhooks.claim_due(current).await?;
        let mut report = DispatchReport {
            fired: claimed.len(),
            ..Default::default()
        };
        if claimed.is_empty() {
            return Ok(report);
        }

        let mut outgoing = Vec::with_capacity(claimed.len());
        for webhook in &claimed {
            match self.collect(webhook.watermark, current)? {
                Some(notification) => outgoing.push((webhook, notification)),
                None => debug!(
                    "Webhook {} due at {} but its tracks were wiped",
                    webhook.id, current
                ),
            }
        }

        let results = join_all(
            outgoing
                .iter()
                .map(|(webhook, notification)| self.deliver(webhook, notification)),
        )
        .await;
        report.delivered = results.iter().filter(|ok| **ok).count();
        report.failed = results.len() - report.delivered;

        info!(
            "Dispatch at sequence {}: {} fired, {} delivered, {} failed",
            current, report.fired, report.delivered, report.failed
        );
        Ok(report)
    }

    /// Reports every track ingested since the previous tick to `sink_url`.
    ///
    /// Returns whether a notification was delivered.
    pub async fn clock_tick(&self, sink_url: &str) -> Result<bool> {
        let notification = {
            let mut watermark = self.clock_watermark.lock().await;
            let current = self.tracks.load_sequence_state()?.high_water;
            if current <= *watermark {
                debug!("Clock tick: nothing new since sequence {}", *watermark);
                return Ok(false);
            }
            let notification = self.collect(*watermark, current)?;
            *watermark = current;
            notification
        };
        let Some(notification) = notification else {
            return Ok(false);
        };

        match self.notifier.deliver(sink_url, &notification).await {
            Ok(()) => {
                info!(
                    "Clock tick reported {} track(s)",
                    notification.message.tracks.len()
                );
                Ok(true)
            }
            Err(e) => {
                warn!("Clock tick delivery failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Current clock-trigger watermark.
    pub async fn clock_watermark(&self) -> u64 {
        *self.clock_watermark.lock().await
    }
}
