//! Wire representations used by the HTTP API.

use chrono::NaiveDate;
use paragliding_core::tracks::{InsertionToken, Track};
use serde::{Deserialize, Serialize};

/// Full track record as returned by `GET /track/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResponse {
    pub id: String,
    #[serde(rename = "H_date")]
    pub h_date: NaiveDate,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    pub track_length: f64,
    pub track_src_url: String,
    pub timestamp: InsertionToken,
}

impl From<Track> for TrackResponse {
    fn from(track: Track) -> Self {
        Self {
            id: track.id(),
            h_date: track.h_date,
            pilot: track.pilot,
            glider: track.glider,
            glider_id: track.glider_id,
            track_length: track.track_length,
            track_src_url: track.track_src_url,
            timestamp: track.timestamp,
        }
    }
}

/// Body of `POST /track`: either a bare JSON string or `{"url": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NewTrackRequest {
    Url(String),
    Object { url: String },
}

impl NewTrackRequest {
    pub fn into_url(self) -> String {
        match self {
            NewTrackRequest::Url(url) | NewTrackRequest::Object { url } => url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaResponse {
    /// Time since startup as an ISO 8601 duration.
    pub uptime: String,
    pub info: String,
    pub version: String,
}

/// Formats whole seconds as an ISO 8601 duration (`P1DT2H3M4S`).
pub fn iso8601_duration(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    out.push('T');
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if seconds > 0 || out.ends_with('T') {
        out.push_str(&format!("{}S", seconds));
    }
    out
}
