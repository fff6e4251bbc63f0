//! IGC flight-log support for the paragliding tracker.
//!
//! Fetches IGC files over HTTP, extracts the header fields the tracker keeps
//! and measures the flown distance from the fix records.

pub mod distance;
pub mod errors;
pub mod parser;
pub mod source;

pub use distance::{haversine_km, track_length_km, EARTH_RADIUS_KM};
pub use errors::IgcError;
pub use parser::{parse, Fix, IgcTrack};
pub use source::{HttpTrackSource, DEFAULT_FETCH_TIMEOUT};
