//! Tracks domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::TRACK_ID_PREFIX;
use crate::errors::{Error, Result, ValidationError};

/// Logical insertion clock value used as the ticker cursor.
///
/// Tokens are close to wall-clock milliseconds but are only meaningful for
/// ordering: every issued token is strictly greater than the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertionToken(pub u64);

impl fmt::Display for InsertionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InsertionToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(InsertionToken)
            .map_err(|_| Error::InvalidCursor(format!("'{}' is not a ticker timestamp", s)))
    }
}

/// Metadata extracted from a track file by the track source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub h_date: NaiveDate,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    /// Sum of point-to-point geodesic distances, in kilometres.
    pub track_length: f64,
}

/// Domain model representing an ingested track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub seq: u64,
    pub h_date: NaiveDate,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    pub track_length: f64,
    pub track_src_url: String,
    pub timestamp: InsertionToken,
}

impl Track {
    pub fn new(seq: u64, summary: TrackSummary, url: &str, timestamp: InsertionToken) -> Self {
        Self {
            seq,
            h_date: summary.h_date,
            pilot: summary.pilot,
            glider: summary.glider,
            glider_id: summary.glider_id,
            track_length: summary.track_length.max(0.0),
            track_src_url: url.to_string(),
            timestamp,
        }
    }

    /// Public identifier (`igc<seq>`).
    pub fn id(&self) -> String {
        format_track_id(self.seq)
    }

    /// Plain-text rendering of a single field.
    pub fn field_value(&self, field: TrackField) -> String {
        match field {
            TrackField::Pilot => self.pilot.clone(),
            TrackField::Glider => self.glider.clone(),
            TrackField::GliderId => self.glider_id.clone(),
            TrackField::TrackLength => self.track_length.to_string(),
            TrackField::HDate => self.h_date.to_string(),
            TrackField::TrackSrcUrl => self.track_src_url.clone(),
        }
    }
}

/// Fields addressable through the per-field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackField {
    Pilot,
    Glider,
    GliderId,
    TrackLength,
    HDate,
    TrackSrcUrl,
}

impl FromStr for TrackField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pilot" => Ok(TrackField::Pilot),
            "glider" => Ok(TrackField::Glider),
            "glider_id" => Ok(TrackField::GliderId),
            "track_length" => Ok(TrackField::TrackLength),
            "h_date" | "H_date" => Ok(TrackField::HDate),
            "track_src_url" => Ok(TrackField::TrackSrcUrl),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown track field '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Allocation state restored from the repository at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceState {
    /// Greatest sequence number ever issued. Survives a wipe.
    pub high_water: u64,
    /// Most recently issued insertion token.
    pub last_token: Option<InsertionToken>,
}

impl SequenceState {
    /// Next token: wall-clock milliseconds, bumped past the previous token.
    pub fn next_token(&self, now_millis: i64) -> InsertionToken {
        let now = u64::try_from(now_millis).unwrap_or(0);
        match self.last_token {
            Some(InsertionToken(last)) if now <= last => InsertionToken(last + 1),
            _ => InsertionToken(now),
        }
    }
}

pub fn format_track_id(seq: u64) -> String {
    format!("{}{}", TRACK_ID_PREFIX, seq)
}

/// Parses `igc<N>` back into its sequence number.
pub fn parse_track_id(id: &str) -> Result<u64> {
    id.strip_prefix(TRACK_ID_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u64>().ok())
        .filter(|seq| *seq > 0)
        .ok_or_else(|| Error::NotFound(format!("unknown track '{}'", id)))
}
