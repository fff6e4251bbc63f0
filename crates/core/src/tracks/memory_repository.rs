//! In-memory track repository built on [`SequentialStore`].

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::store::SequentialStore;
use crate::tracks::tracks_model::{InsertionToken, SequenceState, Track};
use crate::tracks::tracks_traits::TrackRepositoryTrait;

#[derive(Default)]
struct TrackTable {
    store: SequentialStore<Track>,
    last_token: Option<InsertionToken>,
}

/// Process-local track repository. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryTrackRepository {
    table: Mutex<TrackTable>,
}

impl InMemoryTrackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, TrackTable>> {
        self.table
            .lock()
            .map_err(|_| Error::InvariantViolation("track table lock poisoned".to_string()))
    }
}

#[async_trait]
impl TrackRepositoryTrait for InMemoryTrackRepository {
    fn get_by_seq(&self, seq: u64) -> Result<Option<Track>> {
        Ok(self.table()?.store.get(seq).cloned())
    }

    fn count(&self) -> Result<u64> {
        Ok(self.table()?.store.count() as u64)
    }

    fn last_seq(&self) -> Result<Option<u64>> {
        Ok(self.table()?.store.last_key())
    }

    fn list_range(&self, after: u64, upto: u64, limit: Option<usize>) -> Result<Vec<Track>> {
        let table = self.table()?;
        Ok(match limit {
            Some(limit) => table
                .store
                .range_after(after, limit)
                .take_while(|(seq, _)| *seq <= upto)
                .map(|(_, t)| t.clone())
                .collect(),
            None => table.store.range(after, upto).map(|(_, t)| t.clone()).collect(),
        })
    }

    fn find_at_or_before(&self, cursor: InsertionToken) -> Result<Option<Track>> {
        let table = self.table()?;
        let mut anchor = None;
        for (_, track) in table.store.iter() {
            if track.timestamp > cursor {
                break;
            }
            anchor = Some(track);
        }
        Ok(anchor.cloned())
    }

    fn load_sequence_state(&self) -> Result<SequenceState> {
        let table = self.table()?;
        Ok(SequenceState {
            high_water: table.store.high_water(),
            last_token: table.last_token,
        })
    }

    async fn insert(&self, track: Track) -> Result<Track> {
        let mut table = self.table()?;
        if let Some(last) = table.last_token {
            if track.timestamp <= last {
                return Err(Error::InvariantViolation(format!(
                    "token {} is not after {}",
                    track.timestamp, last
                )));
            }
        }
        table.store.insert(track.seq, track.clone())?;
        table.last_token = Some(track.timestamp);
        Ok(track)
    }

    async fn wipe(&self) -> Result<u64> {
        Ok(self.table()?.store.wipe() as u64)
    }
}
