//! `MockDirectory` — a test double for `EventDirectory`.
//!
//! Useful in unit tests where no storage layer is available or relevant.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::directory::{EventDirectory, LookupUnavailable};

/// Behaviour injected into `MockDirectory` at construction time.
pub enum MockLookup {
    /// Every identifier resolves to an existing event.
    Exists,
    /// No identifier resolves.
    Missing,
    /// The check itself fails with the given cause.
    Unavailable(String),
}

/// A mock directory that records every lookup it receives and answers
/// with a programmer-specified result.
pub struct MockDirectory {
    /// What the directory will answer.
    pub behaviour: MockLookup,
    /// All identifiers looked up (in call order).
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockDirectory {
    /// Create a mock where every referenced event exists.
    pub fn exists() -> Self {
        Self {
            behaviour: MockLookup::Exists,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock where no referenced event exists.
    pub fn missing() -> Self {
        Self {
            behaviour: MockLookup::Missing,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose lookups always fail.
    pub fn unavailable(cause: impl Into<String>) -> Self {
        Self {
            behaviour: MockLookup::Unavailable(cause.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of lookups this directory has served.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EventDirectory for MockDirectory {
    async fn event_exists(&self, event_id: &str) -> Result<bool, LookupUnavailable> {
        self.calls.lock().unwrap().push(event_id.to_owned());

        match &self.behaviour {
            MockLookup::Exists => Ok(true),
            MockLookup::Missing => Ok(false),
            MockLookup::Unavailable(cause) => Err(LookupUnavailable(cause.clone())),
        }
    }
}
