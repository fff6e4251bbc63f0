use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};

use super::tracks_model::{parse_track_id, InsertionToken, SequenceState, Track, TrackField};
use super::tracks_traits::{TrackRepositoryTrait, TrackServiceTrait, TrackSourceTrait};

/// Ingestion and lookup of tracks.
///
/// Sequence numbers and insertion tokens are allocated under `sequence`, so two
/// concurrent ingestions can never be handed the same identifier.
pub struct TrackService {
    repository: Arc<dyn TrackRepositoryTrait>,
    source: Arc<dyn TrackSourceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    sequence: Mutex<SequenceState>,
}

impl TrackService {
    pub fn new(
        repository: Arc<dyn TrackRepositoryTrait>,
        source: Arc<dyn TrackSourceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        let state = repository.load_sequence_state()?;
        debug!(
            "Track sequence restored: high-water {}, last token {:?}",
            state.high_water, state.last_token
        );
        Ok(TrackService {
            repository,
            source,
            event_sink,
            sequence: Mutex::new(state),
        })
    }

    fn find(&self, id: &str) -> Result<Track> {
        let seq = parse_track_id(id)?;
        self.repository
            .get_by_seq(seq)?
            .ok_or_else(|| Error::NotFound(format!("unknown track '{}'", id)))
    }
}

#[async_trait]
impl TrackServiceTrait for TrackService {
    async fn ingest(&self, url: &str) -> Result<Track> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingField("track URL".to_string()).into());
        }

        // Fetching can be slow; keep it outside the allocation lock.
        let summary = self.source.fetch(url).await?;

        let track = {
            let mut state = self.sequence.lock().await;
            let seq = state.high_water + 1;
            let timestamp = state.next_token(Utc::now().timestamp_millis());
            let stored = self
                .repository
                .insert(Track::new(seq, summary, url, timestamp))
                .await?;
            state.high_water = seq;
            state.last_token = Some(timestamp);
            // Emitted under the lock so the dispatcher sees events in seq order.
            self.event_sink
                .emit(DomainEvent::track_ingested(stored.seq, stored.timestamp));
            stored
        };

        info!(
            "Ingested track {} ({:.2} km) from {}",
            track.id(),
            track.track_length,
            url
        );
        Ok(track)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let Some(last) = self.repository.last_seq()? else {
            return Ok(Vec::new());
        };
        Ok(self
            .repository
            .list_range(0, last, None)?
            .iter()
            .map(Track::id)
            .collect())
    }

    fn get_track(&self, id: &str) -> Result<Track> {
        self.find(id)
    }

    fn get_field(&self, id: &str, field: &str) -> Result<String> {
        let field: TrackField = field.parse()?;
        Ok(self.find(id)?.field_value(field))
    }

    fn latest_token(&self) -> Result<InsertionToken> {
        let last = self
            .repository
            .last_seq()?
            .ok_or_else(|| Error::NotFound("no tracks have been ingested".to_string()))?;
        self.repository
            .get_by_seq(last)?
            .map(|track| track.timestamp)
            .ok_or_else(|| Error::NotFound("no tracks have been ingested".to_string()))
    }

    fn count(&self) -> Result<u64> {
        self.repository.count()
    }

    fn high_water(&self) -> Result<u64> {
        Ok(self.repository.load_sequence_state()?.high_water)
    }

    async fn wipe(&self) -> Result<u64> {
        let _guard = self.sequence.lock().await;
        let previous = self.repository.wipe().await?;
        info!("Wiped {} track(s)", previous);
        self.event_sink.emit(DomainEvent::tracks_wiped(previous));
        Ok(previous)
    }
}
