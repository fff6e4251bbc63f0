//! Core error types for the tracker.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracker.
///
/// Client-facing failures (validation, unknown identifiers, unparseable
/// sources, bad cursors) are kept apart from internal invariant violations so
/// the HTTP layer can map them to 400 and 500 respectively.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Track source could not be read: {0}")]
    TrackSource(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Webhook delivery failed: {0}")]
    Delivery(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True for failures caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Validation(_)
            | Error::NotFound(_)
            | Error::TrackSource(_)
            | Error::InvalidCursor(_) => true,
            Error::Database(DatabaseError::NotFound(_)) => true,
            _ => false,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DatabaseError {
    /// True when the backing store could not be reached at all, as opposed to
    /// answering that a record does not exist.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolCreationFailed(_)
        )
    }
}

/// Errors raised while validating caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
