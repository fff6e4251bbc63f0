//! Database models for tracks.

use chrono::NaiveDate;
use diesel::prelude::*;

use paragliding_core::tracks::{InsertionToken, Track};

/// Database model for tracks
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::tracks)]
#[diesel(primary_key(seq))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackDB {
    pub seq: i64,
    pub h_date: NaiveDate,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    pub track_length: f64,
    pub track_src_url: String,
    pub token: i64,
}

impl From<TrackDB> for Track {
    fn from(db: TrackDB) -> Self {
        Self {
            seq: db.seq as u64,
            h_date: db.h_date,
            pilot: db.pilot,
            glider: db.glider,
            glider_id: db.glider_id,
            track_length: db.track_length,
            track_src_url: db.track_src_url,
            timestamp: InsertionToken(db.token as u64),
        }
    }
}

impl From<Track> for TrackDB {
    fn from(domain: Track) -> Self {
        Self {
            seq: domain.seq as i64,
            h_date: domain.h_date,
            pilot: domain.pilot,
            glider: domain.glider,
            glider_id: domain.glider_id,
            track_length: domain.track_length,
            track_src_url: domain.track_src_url,
            token: domain.timestamp.0 as i64,
        }
    }
}
