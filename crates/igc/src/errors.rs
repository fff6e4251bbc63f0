//! Error types for IGC retrieval and parsing.

use paragliding_core::errors::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IgcError {
    #[error("Invalid track URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to download track: {0}")]
    Fetch(String),

    #[error("Track host answered HTTP {0}")]
    HttpStatus(u16),

    #[error("Missing IGC header: {0}")]
    MissingHeader(&'static str),

    #[error("Malformed IGC record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Not an IGC file")]
    NotIgc,
}

/// Every retrieval or parse failure is the submitter's problem.
impl From<IgcError> for Error {
    fn from(err: IgcError) -> Self {
        Error::TrackSource(err.to_string())
    }
}
