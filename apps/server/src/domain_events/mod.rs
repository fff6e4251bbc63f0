//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink and hands ingestion events to
//! the webhook dispatcher. Events are processed one at a time, in the order
//! they were emitted, by a single queue worker.

mod planner;
mod queue_worker;
mod sink;

pub use sink::WebDomainEventSink;
