//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to the background queue worker.

use std::sync::{Arc, Mutex};

use paragliding_core::{
    events::{DomainEvent, DomainEventSink},
    webhooks::Dispatcher,
};
use tokio::sync::mpsc;

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};

/// Domain event sink for the web server runtime.
///
/// # Two-Phase Initialization
///
/// The track service needs the sink and the dispatcher needs the track
/// repository, so the sink is created first and the worker started once the
/// dispatcher exists:
///
/// 1. Create the sink with `new()` - this just creates the channel
/// 2. Call `start_worker()` - this spawns the worker
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    /// Creates a new WebDomainEventSink.
    ///
    /// Events received before `start_worker()` are buffered.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the background worker that processes events.
    ///
    /// Returns `false` (and does nothing) if the worker was already started.
    pub fn start_worker(&self, dispatcher: Arc<Dispatcher>) -> bool {
        let rx = match self.rx.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        let Some(rx) = rx else {
            tracing::warn!("Domain event worker already started");
            return false;
        };

        let deps = Arc::new(QueueWorkerDeps { dispatcher });
        tokio::spawn(event_queue_worker(rx, deps));
        true
    }

    /// Creates a WebDomainEventSink with just the sender.
    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best-effort: a closed channel only means the worker is gone.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}
