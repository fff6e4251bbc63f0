/// Prefix of every public track identifier (`igc1`, `igc2`, ...).
pub const TRACK_ID_PREFIX: &str = "igc";

/// Maximum number of track identifiers returned by a single ticker window.
pub const TICKER_WINDOW_CAP: usize = 5;

/// Threshold applied when a webhook is registered without one (or with 0).
pub const DEFAULT_MIN_TRIGGER_VALUE: u32 = 1;

/// Largest accepted threshold; the SQLite column is a 32-bit integer.
pub const MAX_MIN_TRIGGER_VALUE: u32 = i32::MAX as u32;

/// Service description reported by the meta endpoint.
pub const SERVICE_INFO: &str = "Service for Paragliding tracks.";
