//! Domain event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Trait for receiving domain events.
///
/// Implementations queue events for the webhook dispatcher.
/// Core services emit events through this trait after successful mutations.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue events for async processing
/// - Failure to emit must not affect domain operations (best-effort)
pub trait DomainEventSink: Send + Sync {
    /// Emit a single domain event.
    fn emit(&self, event: DomainEvent);

    /// Emit multiple domain events.
    ///
    /// Default implementation calls `emit()` for each event.
    /// Implementations may override for batch optimization.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}
