//! Paragliding Core - Domain entities, services, and traits.
//!
//! This crate contains the ingestion, ticker pagination and webhook dispatch
//! logic of the tracker. It is database-agnostic and defines repository traits
//! that are implemented by the `storage-sqlite` crate (and by the in-memory
//! repositories shipped here).

pub mod constants;
pub mod errors;
pub mod events;
pub mod store;
pub mod ticker;
pub mod tracks;
pub mod webhooks;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
