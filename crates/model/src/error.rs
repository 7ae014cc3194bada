//! Validation error taxonomy.

use thiserror::Error;

/// A violated write-time rule.
///
/// Every variant maps to exactly one rule in [`crate::rules`], so a caller
/// (typically an HTTP layer) can turn it into a field-level message.
/// `Clone`/`PartialEq` are derived so tests can assert on exact outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ------ Field rules ------

    /// A required field was absent or empty after trimming.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// `mode` was not one of `online`, `offline`, `hybrid`.
    #[error("mode must be online, offline, or hybrid (got '{0}')")]
    InvalidMode(String),

    /// A sequence field (`agenda`, `tags`) contained no items.
    #[error("{0} must contain at least one item")]
    EmptyCollection(&'static str),

    /// The date could not be parsed by any accepted format.
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// The time did not match `HH:MM` with optional `AM`/`PM`.
    #[error("invalid time '{0}', expected HH:MM or HH:MM AM/PM")]
    InvalidTime(String),

    /// The email did not have a `local@domain.tld` shape.
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    // ------ Reference rules ------

    /// The referenced event was confirmed missing at write time.
    #[error("referenced event '{0}' does not exist")]
    DanglingReference(String),

    /// The existence check itself failed, so the reference could not be
    /// verified either way. Distinct from [`Self::DanglingReference`]:
    /// the event may well exist.
    #[error("could not verify referenced event: {0}")]
    ValidationUnavailable(String),
}
