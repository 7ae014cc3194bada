//! The `EventDirectory` trait — the existence-check contract the booking
//! rules depend on.
//!
//! Defined here (in the model crate) so the rules can depend on it at
//! compile time while the storage layer implements it — no runtime
//! circular-dependency workaround needed.

use async_trait::async_trait;
use thiserror::Error;

/// The existence check could not be performed at all (connectivity,
/// timeouts, …). Deliberately *not* a "missing event" answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event lookup unavailable: {0}")]
pub struct LookupUnavailable(pub String);

/// Answers "does an event with this identifier exist right now?".
///
/// Implemented by the storage layer for production and by
/// [`crate::mock::MockDirectory`] in tests. `Ok(false)` is a definitive
/// answer; failures to answer travel through [`LookupUnavailable`].
#[async_trait]
pub trait EventDirectory: Send + Sync {
    async fn event_exists(&self, event_id: &str) -> Result<bool, LookupUnavailable>;
}
