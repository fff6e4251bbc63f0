use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::constants::TICKER_WINDOW_CAP;
use crate::errors::{Error, Result};
use crate::tracks::{InsertionToken, Track, TrackRepositoryTrait};

use super::ticker_model::Ticker;

/// Trait for ticker operations
pub trait TickerServiceTrait: Send + Sync {
    /// Window starting at the oldest live track.
    fn latest_window(&self) -> Result<Ticker>;
    /// Window of the tracks following the one at or before `cursor`.
    fn cursor_window(&self, cursor: &str) -> Result<Ticker>;
}

pub struct TickerService {
    repository: Arc<dyn TrackRepositoryTrait>,
}

impl TickerService {
    pub fn new(repository: Arc<dyn TrackRepositoryTrait>) -> Self {
        TickerService { repository }
    }

    /// Snapshot of the newest live track. Every window is bounded by it, so a
    /// concurrent ingestion cannot stretch a window mid-scan.
    fn snapshot_latest(&self) -> Result<Track> {
        let last = self
            .repository
            .last_seq()?
            .ok_or_else(|| Error::NotFound("no tracks have been ingested".to_string()))?;
        self.repository.get_by_seq(last)?.ok_or_else(|| {
            Error::InvariantViolation(format!("last sequence {} has no track", last))
        })
    }

    fn build(latest: &Track, window: Vec<Track>, started: Instant) -> Ticker {
        Ticker {
            t_latest: latest.timestamp,
            t_start: window.first().map(|t| t.timestamp),
            t_stop: window.last().map(|t| t.timestamp),
            tracks: window.iter().map(Track::id).collect(),
            processing: started.elapsed().as_millis().to_string(),
        }
    }
}

impl TickerServiceTrait for TickerService {
    fn latest_window(&self) -> Result<Ticker> {
        let started = Instant::now();
        let latest = self.snapshot_latest()?;
        let window = self
            .repository
            .list_range(0, latest.seq, Some(TICKER_WINDOW_CAP))?;
        Ok(Self::build(&latest, window, started))
    }

    fn cursor_window(&self, cursor: &str) -> Result<Ticker> {
        let started = Instant::now();
        let cursor: InsertionToken = cursor.parse()?;
        let latest = self.snapshot_latest().map_err(|e| match e {
            Error::NotFound(_) => Error::InvalidCursor(format!("no track matches {}", cursor)),
            other => other,
        })?;

        let anchor = self
            .repository
            .find_at_or_before(cursor)?
            .filter(|anchor| anchor.seq <= latest.seq)
            .ok_or_else(|| Error::InvalidCursor(format!("no track at or before {}", cursor)))?;
        debug!("Ticker cursor {} anchored at {}", cursor, anchor.id());

        let window = self
            .repository
            .list_range(anchor.seq, latest.seq, Some(TICKER_WINDOW_CAP))?;
        Ok(Self::build(&latest, window, started))
    }
}
