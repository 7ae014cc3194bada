//! Repository functions — one function per storage operation.
//!
//! Every write runs the validation pipeline first, then persists
//! through the shared [`crate::Store`] handle. Reads are pass-through
//! lookups; a miss is an empty result, not an error.

pub mod bookings;
pub mod events;
