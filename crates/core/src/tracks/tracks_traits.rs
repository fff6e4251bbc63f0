use crate::errors::Result;
use crate::tracks::tracks_model::{InsertionToken, SequenceState, Track, TrackSummary};
use async_trait::async_trait;

/// Trait for track repository operations
///
/// Reads are synchronous; writes go through the storage writer and are async.
#[async_trait]
pub trait TrackRepositoryTrait: Send + Sync {
    fn get_by_seq(&self, seq: u64) -> Result<Option<Track>>;
    fn count(&self) -> Result<u64>;
    fn last_seq(&self) -> Result<Option<u64>>;
    /// Live tracks with `after < seq <= upto`, ascending, at most `limit` of them.
    fn list_range(&self, after: u64, upto: u64, limit: Option<usize>) -> Result<Vec<Track>>;
    /// Latest live track whose token is not greater than `cursor`.
    fn find_at_or_before(&self, cursor: InsertionToken) -> Result<Option<Track>>;
    fn load_sequence_state(&self) -> Result<SequenceState>;
    /// Persists a track. Rejects a sequence number that was already issued.
    async fn insert(&self, track: Track) -> Result<Track>;
    /// Deletes every track and returns how many were deleted.
    async fn wipe(&self) -> Result<u64>;
}

/// Trait for the external track source (file retrieval + parsing).
#[async_trait]
pub trait TrackSourceTrait: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<TrackSummary>;
}

/// Trait for track service operations
#[async_trait]
pub trait TrackServiceTrait: Send + Sync {
    async fn ingest(&self, url: &str) -> Result<Track>;
    fn list_ids(&self) -> Result<Vec<String>>;
    fn get_track(&self, id: &str) -> Result<Track>;
    fn get_field(&self, id: &str, field: &str) -> Result<String>;
    fn latest_token(&self) -> Result<InsertionToken>;
    fn count(&self) -> Result<u64>;
    /// Greatest sequence number issued so far (the ingestion count).
    fn high_water(&self) -> Result<u64>;
    async fn wipe(&self) -> Result<u64>;
}
