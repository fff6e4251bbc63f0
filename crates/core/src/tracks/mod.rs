//! Tracks module - domain models, ingestion service, and repository traits.

mod memory_repository;
mod tracks_model;
mod tracks_service;
mod tracks_traits;

#[cfg(test)]
mod tracks_service_tests;

pub use memory_repository::InMemoryTrackRepository;
pub use tracks_model::{
    format_track_id, parse_track_id, InsertionToken, SequenceState, Track, TrackField,
    TrackSummary,
};
pub use tracks_service::TrackService;
pub use tracks_traits::{TrackRepositoryTrait, TrackServiceTrait, TrackSourceTrait};
