//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::tracks::InsertionToken;

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about track data changes. The runtime
/// translates them into webhook dispatch runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A track was ingested and persisted under sequence number `seq`.
    TrackIngested {
        seq: u64,
        timestamp: InsertionToken,
    },

    /// All tracks were wiped by an administrator.
    TracksWiped { previous_count: u64 },
}

impl DomainEvent {
    /// Creates a TrackIngested event.
    pub fn track_ingested(seq: u64, timestamp: InsertionToken) -> Self {
        Self::TrackIngested { seq, timestamp }
    }

    /// Creates a TracksWiped event.
    pub fn tracks_wiped(previous_count: u64) -> Self {
        Self::TracksWiped { previous_count }
    }
}
