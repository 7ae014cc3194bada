//! Document structs that map 1-to-1 onto stored collections.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Field names are serialized in camelCase to match the stored layout
//! (`eventId`, `createdAt`, …). Domain types live in the `model` crate.

use model::{Booking, Event, Mode, ValidatedEvent};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// events
// ---------------------------------------------------------------------------

/// A persisted event document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    /// Unique across the collection (unique index `slug_1`).
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: Mode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl EventRow {
    /// Build a fresh document from validated values, assigning the
    /// identifier and both timestamps.
    pub fn for_insert(validated: ValidatedEvent) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            title: validated.title,
            slug: validated.slug,
            description: validated.description,
            overview: validated.overview,
            image: validated.image,
            venue: validated.venue,
            location: validated.location,
            date: validated.date,
            time: validated.time,
            mode: validated.mode,
            audience: validated.audience,
            agenda: validated.agenda,
            organizer: validated.organizer,
            tags: validated.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id.to_hex(),
            title: row.title,
            slug: row.slug,
            description: row.description,
            overview: row.overview,
            image: row.image,
            venue: row.venue,
            location: row.location,
            date: row.date,
            time: row.time,
            mode: row.mode,
            audience: row.audience,
            agenda: row.agenda,
            organizer: row.organizer,
            tags: row.tags,
            created_at: row.created_at.to_chrono(),
            updated_at: row.updated_at.to_chrono(),
        }
    }
}

// ---------------------------------------------------------------------------
// bookings
// ---------------------------------------------------------------------------

/// A persisted booking document. `event_id` is a logical reference to
/// an event, checked at write time, not enforced by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Indexed (`eventId_1`) for per-event listings.
    pub event_id: ObjectId,
    pub email: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id.to_hex(),
            event_id: row.event_id.to_hex(),
            email: row.email,
            created_at: row.created_at.to_chrono(),
            updated_at: row.updated_at.to_chrono(),
        }
    }
}
