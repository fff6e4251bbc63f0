//! Ticker module - cursor pagination over ingested tracks.

mod ticker_model;
mod ticker_service;

pub use ticker_model::Ticker;
pub use ticker_service::{TickerService, TickerServiceTrait};
