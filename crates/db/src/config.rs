//! Store configuration sourced from the environment.

use std::time::Duration;

use crate::DbError;

/// Environment variable holding the connection string. Required.
pub const MONGODB_URI: &str = "MONGODB_URI";

/// Environment variable naming the database. Optional.
pub const MONGODB_DB: &str = "MONGODB_DB";

const DEFAULT_DATABASE: &str = "eventbook";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to reach the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Upper bound on a single connection attempt. Also caps server
    /// selection, so operations fail fast instead of queuing against a
    /// server that may never come up.
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Build a configuration with default database name and timeout.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Read configuration from the environment.
    ///
    /// # Errors
    /// [`DbError::MissingConnectionString`] when `MONGODB_URI` is unset
    /// or empty — callers treat this as fatal at process start, not as
    /// a runtime condition.
    pub fn from_env() -> Result<Self, DbError> {
        let uri = std::env::var(MONGODB_URI)
            .ok()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(DbError::MissingConnectionString)?;
        let database =
            std::env::var(MONGODB_DB).unwrap_or_else(|_| DEFAULT_DATABASE.to_owned());

        Ok(Self {
            uri,
            database,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }
}
