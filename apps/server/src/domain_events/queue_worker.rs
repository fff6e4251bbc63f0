//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, drains whatever else is already
//! queued, and runs the webhook dispatcher once per ingested track.

use std::sync::Arc;

use paragliding_core::{events::DomainEvent, webhooks::Dispatcher};
use tokio::sync::mpsc;

use super::planner::{plan_dispatch, wiped_count};

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    pub dispatcher: Arc<Dispatcher>,
}

/// Runs the event queue worker until every sender is dropped.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(event) = rx.try_recv() {
            batch.push(event);
        }
        process_event_batch(&batch, &deps).await;
    }

    tracing::info!("Domain event queue worker shutting down");
}

/// Processes a batch of domain events.
async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    tracing::debug!("Processing batch of {} domain event(s)", events.len());

    let wiped = wiped_count(events);
    if wiped > 0 {
        tracing::info!("{} track(s) wiped; pending notifications skip them", wiped);
    }

    for seq in plan_dispatch(events) {
        match deps.dispatcher.on_track_ingested(seq).await {
            Ok(report) if report.fired > 0 => tracing::debug!(
                "Dispatch for track {}: {} fired, {} failed",
                seq,
                report.fired,
                report.failed
            ),
            Ok(_) => {}
            Err(e) => tracing::error!("Webhook dispatch for track {} failed: {}", seq, e),
        }
    }
}
