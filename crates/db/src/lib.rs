//! `db` crate — pure persistence layer for the event-booking domain.
//!
//! Provides the shared connection manager, typed document structs, and
//! repository functions for the `events` and `bookings` collections.
//! No validation logic lives here; the rules come from the `model`
//! crate and run before every write.

pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod mongo;
pub mod repository;

pub use config::StoreConfig;
pub use error::DbError;
pub use mongo::Store;
