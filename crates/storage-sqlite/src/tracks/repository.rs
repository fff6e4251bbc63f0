use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::error;

use paragliding_core::errors::{Error, Result};
use paragliding_core::tracks::{InsertionToken, SequenceState, Track, TrackRepositoryTrait};

use super::model::TrackDB;
use crate::counters::{self, LAST_TOKEN, TRACKS_ISSUED};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::tracks;
use crate::schema::tracks::dsl::*;

/// Saturates at `i64::MAX`: every stored value fits below it.
fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub struct TrackRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TrackRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        TrackRepository { pool, writer }
    }
}

#[async_trait]
impl TrackRepositoryTrait for TrackRepository {
    fn get_by_seq(&self, track_seq: u64) -> Result<Option<Track>> {
        let mut conn = get_connection(&self.pool)?;
        let track = tracks
            .find(track_seq as i64)
            .select(TrackDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(track.map(Track::from))
    }

    fn count(&self) -> Result<u64> {
        let mut conn = get_connection(&self.pool)?;
        let total: i64 = tracks.select(count_star()).first(&mut conn).into_core()?;
        Ok(total as u64)
    }

    fn last_seq(&self) -> Result<Option<u64>> {
        let mut conn = get_connection(&self.pool)?;
        let last: Option<i64> = tracks.select(max(seq)).first(&mut conn).into_core()?;
        Ok(last.map(|s| s as u64))
    }

    fn list_range(&self, after: u64, upto: u64, limit: Option<usize>) -> Result<Vec<Track>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = tracks
            .filter(seq.gt(clamp_to_i64(after)))
            .filter(seq.le(clamp_to_i64(upto)))
            .order(seq.asc())
            .select(TrackDB::as_select())
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit as i64);
        }
        let rows = query.load::<TrackDB>(&mut conn).into_core()?;
        Ok(rows.into_iter().map(Track::from).collect())
    }

    fn find_at_or_before(&self, cursor: InsertionToken) -> Result<Option<Track>> {
        let mut conn = get_connection(&self.pool)?;
        let anchor = tracks
            .filter(token.le(clamp_to_i64(cursor.0)))
            .order(token.desc())
            .select(TrackDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(anchor.map(Track::from))
    }

    fn load_sequence_state(&self) -> Result<SequenceState> {
        let mut conn = get_connection(&self.pool)?;
        let issued = counters::read(&mut conn, TRACKS_ISSUED)?.unwrap_or(0);
        let last = counters::read(&mut conn, LAST_TOKEN)?;
        Ok(SequenceState {
            high_water: issued as u64,
            last_token: last.map(|t| InsertionToken(t as u64)),
        })
    }

    async fn insert(&self, track: Track) -> Result<Track> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Track> {
                let issued = counters::read(conn, TRACKS_ISSUED)?.unwrap_or(0);
                if track.seq as i64 <= issued {
                    error!(
                        "Rejected track insert: sequence {} is not above {}",
                        track.seq, issued
                    );
                    return Err(Error::InvariantViolation(format!(
                        "track sequence {} already issued",
                        track.seq
                    )));
                }
                if let Some(last) = counters::read(conn, LAST_TOKEN)? {
                    if track.timestamp.0 as i64 <= last {
                        return Err(Error::InvariantViolation(format!(
                            "token {} is not after {}",
                            track.timestamp, last
                        )));
                    }
                }

                let row = TrackDB::from(track);
                let stored = diesel::insert_into(tracks::table)
                    .values(&row)
                    .returning(TrackDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                counters::write(conn, TRACKS_ISSUED, stored.seq)?;
                counters::write(conn, LAST_TOKEN, stored.token)?;
                Ok(Track::from(stored))
            })
            .await
    }

    async fn wipe(&self) -> Result<u64> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<u64> {
                let deleted = diesel::delete(tracks::table).execute(conn).into_core()?;
                Ok(deleted as u64)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn create_test_repository() -> (TrackRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (TrackRepository::new(Arc::clone(&pool), writer), temp_dir)
    }

    fn track(n: u64) -> Track {
        Track {
            seq: n,
            h_date: NaiveDate::from_ymd_opt(2016, 2, 19).unwrap(),
            pilot: "Miguel Angel Gordillo".to_string(),
            glider: "RV8".to_string(),
            glider_id: "EC-XLL".to_string(),
            track_length: 443.25,
            track_src_url: format!("http://tracks.test/{}.igc", n),
            timestamp: InsertionToken(1_000 + n * 10),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (repo, _dir) = create_test_repository();
        assert_eq!(repo.load_sequence_state().unwrap(), SequenceState::default());

        let stored = repo.insert(track(1)).await.unwrap();
        assert_eq!(stored, track(1));
        assert_eq!(repo.get_by_seq(1).unwrap(), Some(track(1)));
        assert_eq!(repo.get_by_seq(2).unwrap(), None);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.load_sequence_state().unwrap(),
            SequenceState {
                high_water: 1,
                last_token: Some(InsertionToken(1_010)),
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_sequence_is_invariant_violation() {
        let (repo, _dir) = create_test_repository();
        repo.insert(track(1)).await.unwrap();

        let err = repo.insert(track(1)).await.unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_range_and_anchor_queries() {
        let (repo, _dir) = create_test_repository();
        for n in 1..=7 {
            repo.insert(track(n)).await.unwrap();
        }

        let seqs: Vec<u64> = repo
            .list_range(2, 6, Some(3))
            .unwrap()
            .iter()
            .map(|t| t.seq)
            .collect();
        assert_eq!(seqs, vec![3, 4, 5]);
        assert_eq!(repo.list_range(2, 6, None).unwrap().len(), 4);

        assert_eq!(repo.last_seq().unwrap(), Some(7));
        assert_eq!(
            repo.find_at_or_before(InsertionToken(1_035)).unwrap().map(|t| t.seq),
            Some(3)
        );
        assert_eq!(repo.find_at_or_before(InsertionToken(5)).unwrap(), None);
    }

    #[tokio::test]
    async fn test_bounds_beyond_i64_saturate() {
        let (repo, _dir) = create_test_repository();
        repo.insert(track(1)).await.unwrap();
        repo.insert(track(2)).await.unwrap();

        assert_eq!(
            repo.find_at_or_before(InsertionToken(u64::MAX))
                .unwrap()
                .map(|t| t.seq),
            Some(2)
        );
        assert_eq!(repo.list_range(0, u64::MAX, None).unwrap().len(), 2);
        assert!(repo.list_range(u64::MAX, u64::MAX, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wipe_keeps_issued_counter() {
        let (repo, _dir) = create_test_repository();
        for n in 1..=3 {
            repo.insert(track(n)).await.unwrap();
        }

        assert_eq!(repo.wipe().await.unwrap(), 3);
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(repo.last_seq().unwrap(), None);
        assert_eq!(repo.load_sequence_state().unwrap().high_water, 3);
        assert!(repo.insert(track(2)).await.is_err());
        repo.insert(track(4)).await.unwrap();
        let live: Vec<u64> = repo
            .list_range(0, 10, None)
            .unwrap()
            .iter()
            .map(|t| t.seq)
            .collect();
        assert_eq!(live, vec![4]);
    }
}
