//! `model` crate — domain types and the write-time validation pipeline.
//!
//! Everything here is pure: no driver types, no I/O. The only async seam
//! is [`EventDirectory`], through which the booking rules ask the storage
//! layer whether a referenced event exists.

pub mod directory;
pub mod error;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod rules;

pub use directory::{EventDirectory, LookupUnavailable};
pub use error::ValidationError;
pub use models::{
    Booking, BookingDraft, Event, EventDraft, EventPatch, Mode, ValidatedBooking, ValidatedEvent,
};
pub use rules::{apply_event_patch, validate_booking, validate_event};
