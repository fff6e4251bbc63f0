//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. The server runtime implements the sink
//! to hand events to the webhook dispatcher without blocking the request.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
