//! Domain types for events and bookings.
//!
//! These carry *canonical* values only — callers obtain them exclusively
//! through the validation pipeline in [`crate::rules`] and the storage
//! layer. Draft types hold raw caller input and make no promises.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How an event is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Online,
    Offline,
    Hybrid,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown event mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A stored event record.
///
/// `slug` is functionally dependent on `title` and unique across all
/// events; `date` is always `YYYY-MM-DD` and `time` always `H(H):MM`
/// with an optional `AM`/`PM` suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Storage-assigned identifier (ObjectId hex).
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    /// Image URI or path. Never trimmed beyond emptiness checking.
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Canonical calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Canonical clock time, `H(H):MM` with optional `AM`/`PM`.
    pub time: String,
    pub mode: Mode,
    pub audience: String,
    /// Ordered agenda items. Never empty.
    pub agenda: Vec<String>,
    pub organizer: String,
    /// Set-like tag list. Never empty.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw caller input for creating an event.
///
/// `mode` is a free string here; the pipeline parses it into [`Mode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// A partial update to an existing event.
///
/// Only fields that are `Some` are re-validated and rewritten — the
/// dirty-field policy. Everything left `None` keeps its stored value
/// untouched and unchecked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// The outcome of a successful event validation: every field canonical,
/// slug derived, ready to persist. Carries no storage-assigned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub title: String,
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
}

impl From<&Event> for ValidatedEvent {
    /// Start an update from the stored record — stored values are
    /// canonical by construction, so they re-enter the pipeline as-is.
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            overview: event.overview.clone(),
            image: event.image.clone(),
            venue: event.venue.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            mode: event.mode,
            audience: event.audience.clone(),
            agenda: event.agenda.clone(),
            organizer: event.organizer.clone(),
            tags: event.tags.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// A stored booking record. `event_id` is a non-owning reference to an
/// [`Event`]; the pipeline guarantees it resolved at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Storage-assigned identifier (ObjectId hex).
    pub id: String,
    pub event_id: String,
    /// Always stored lowercase and trimmed.
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw caller input for creating a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDraft {
    pub event_id: String,
    pub email: String,
}

/// A booking that passed validation, including the existence check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub event_id: String,
    pub email: String,
}
