//! Shared connection lifecycle.
//!
//! One live handle per process, established lazily and reused by every
//! caller. While an attempt is in flight, all concurrent callers await
//! that same attempt, so a burst of first requests produces exactly one
//! connection. A failed attempt clears the marker and the next call
//! retries from scratch. Attempts run on a detached task: a caller that
//! abandons its request cannot tear down the shared connection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{error, info};

use crate::DbError;

/// Produces the shared handle.
///
/// Production code uses [`crate::mongo::MongoConnector`]; tests inject
/// a scripted double. Handles must be cheap to clone (driver handles
/// are reference-counted internally).
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, DbError>;
}

/// A connection attempt every concurrent caller can await. The error is
/// pre-rendered to a string so the shared output is `Clone`.
type Attempt<H> = Shared<BoxFuture<'static, Result<H, String>>>;

enum State<H> {
    /// No handle and no attempt in flight.
    Idle,
    /// Exactly one attempt in flight; callers await it.
    Connecting(Attempt<H>),
    /// A live handle, cached for the rest of the process.
    Ready(H),
}

/// Guarded lazy singleton around a [`Connector`].
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    attempt_timeout: Duration,
    state: Arc<Mutex<State<C::Handle>>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, attempt_timeout: Duration) -> Self {
        Self {
            connector: Arc::new(connector),
            attempt_timeout,
            state: Arc::new(Mutex::new(State::Idle)),
        }
    }

    /// Return the shared handle, connecting first if necessary.
    ///
    /// # Errors
    /// [`DbError::Connection`] when the attempt this caller awaited
    /// (its own or the shared in-flight one) fails or times out.
    pub async fn handle(&self) -> Result<C::Handle, DbError> {
        let attempt = {
            let mut state = self.state.lock().unwrap();
            match &*state {
                State::Ready(handle) => return Ok(handle.clone()),
                State::Connecting(attempt) => attempt.clone(),
                State::Idle => {
                    let attempt = self.spawn_attempt();
                    *state = State::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await.map_err(DbError::Connection)
    }

    /// Start one detached connection attempt.
    ///
    /// The spawned task, not the awaiting callers, performs the state
    /// transition: the outcome is recorded even when every caller has
    /// already gone away.
    fn spawn_attempt(&self) -> Attempt<C::Handle> {
        let connector = Arc::clone(&self.connector);
        let state = Arc::clone(&self.state);
        let attempt_timeout = self.attempt_timeout;

        let task = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(attempt_timeout, connector.connect()).await {
                Ok(Ok(handle)) => Ok(handle),
                Ok(Err(err)) => Err(err.to_string()),
                Err(_) => Err(format!(
                    "connection attempt timed out after {attempt_timeout:?}"
                )),
            };

            let mut state = state.lock().unwrap();
            match &outcome {
                Ok(handle) => {
                    info!("database connection established");
                    *state = State::Ready(handle.clone());
                }
                Err(cause) => {
                    error!("database connection failed: {cause}");
                    *state = State::Idle;
                }
            }
            outcome
        });

        let state = Arc::clone(&self.state);
        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    // A panicked task never ran its own transition, so
                    // clear the marker here or no retry can ever start.
                    *state.lock().unwrap() = State::Idle;
                    error!("database connection task aborted: {join_err}");
                    Err(format!("connection task aborted: {join_err}"))
                }
            }
        }
        .boxed()
        .shared()
    }
}
