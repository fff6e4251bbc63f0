use serde::{Deserialize, Serialize};

use crate::tracks::InsertionToken;

/// One page of the ticker.
///
/// `t_start`/`t_stop` are the tokens of the first and last entries of the
/// window; they are `None` only when the window is empty (a cursor pointing at
/// the latest track). `t_latest` always refers to the most recent track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub t_latest: InsertionToken,
    pub t_start: Option<InsertionToken>,
    pub t_stop: Option<InsertionToken>,
    pub tracks: Vec<String>,
    /// Time spent building the window, in milliseconds.
    pub processing: String,
}
