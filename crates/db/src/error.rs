//! Typed error type for the db crate.

use model::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    // ------ Configuration (fatal at startup) ------

    /// `MONGODB_URI` was absent or empty. The process cannot run
    /// without a connection string.
    #[error("MONGODB_URI environment variable is not set")]
    MissingConnectionString,

    // ------ Connectivity (retryable) ------

    /// Establishing the shared connection failed or timed out. The
    /// pending-attempt marker has been cleared; the next call starts a
    /// fresh attempt.
    #[error("database connection failed: {0}")]
    Connection(String),

    // ------ Write outcomes ------

    /// The unique index on `slug` rejected the write — another event
    /// already owns this slug.
    #[error("an event with slug '{0}' already exists")]
    DuplicateSlug(String),

    /// The update target does not exist. Read misses are *not* reported
    /// this way; they return empty results.
    #[error("document not found")]
    NotFound,

    /// A write-time rule was violated; carries the field-level detail.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any other driver-level failure.
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
}
