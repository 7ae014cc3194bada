//! Event repository operations.

use model::{apply_event_patch, validate_event, Event, EventDraft, EventPatch, ValidatedEvent};
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use tracing::{info, instrument};

use crate::models::EventRow;
use crate::mongo::{Store, EVENTS};
use crate::DbError;

/// Server code for a unique-index violation.
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Validate, normalize, and persist a new event.
///
/// Returns the stored record with its server-assigned id, timestamps,
/// and derived slug.
///
/// # Errors
/// Any [`model::ValidationError`] from the pipeline, or
/// [`DbError::DuplicateSlug`] when the unique index rejects the derived
/// slug. The pipeline never pre-checks uniqueness; the index decides.
#[instrument(skip(store, draft), fields(title = %draft.title))]
pub async fn create_event(store: &Store, draft: EventDraft) -> Result<Event, DbError> {
    let validated = validate_event(&draft)?;
    let database = store.database().await?;

    let row = EventRow::for_insert(validated);
    let insert = database
        .collection::<EventRow>(EVENTS)
        .insert_one(&row)
        .await;

    if let Err(err) = insert {
        if is_duplicate_key(&err) {
            return Err(DbError::DuplicateSlug(row.slug));
        }
        return Err(err.into());
    }

    info!(slug = %row.slug, "event created");
    Ok(Event::from(row))
}

/// Build the `$set` for an update from the fields the patch touched.
///
/// Untouched fields are not written at all, so a concurrent update to
/// another field is never reverted with stale values from the
/// pre-update fetch. `slug` rides along only when a title change
/// regenerated it; `updatedAt` is always stamped.
fn set_document(current: &Event, next: &ValidatedEvent, patch: &EventPatch) -> Document {
    let mut set = Document::new();
    if patch.title.is_some() {
        set.insert("title", next.title.clone());
        if next.slug != current.slug {
            set.insert("slug", next.slug.clone());
        }
    }
    if patch.description.is_some() {
        set.insert("description", next.description.clone());
    }
    if patch.overview.is_some() {
        set.insert("overview", next.overview.clone());
    }
    if patch.image.is_some() {
        set.insert("image", next.image.clone());
    }
    if patch.venue.is_some() {
        set.insert("venue", next.venue.clone());
    }
    if patch.location.is_some() {
        set.insert("location", next.location.clone());
    }
    if patch.date.is_some() {
        set.insert("date", next.date.clone());
    }
    if patch.time.is_some() {
        set.insert("time", next.time.clone());
    }
    if patch.mode.is_some() {
        set.insert("mode", next.mode.to_string());
    }
    if patch.audience.is_some() {
        set.insert("audience", next.audience.clone());
    }
    if patch.agenda.is_some() {
        set.insert("agenda", next.agenda.clone());
    }
    if patch.organizer.is_some() {
        set.insert("organizer", next.organizer.clone());
    }
    if patch.tags.is_some() {
        set.insert("tags", next.tags.clone());
    }
    set.insert("updatedAt", DateTime::now());
    set
}

/// Re-validate the changed fields of an existing event and persist the
/// update, returning the post-update record.
///
/// Untouched fields keep their stored values and are not re-checked
/// (dirty-field policy); the slug changes only when the title does.
///
/// # Errors
/// [`DbError::NotFound`] when no event has this identifier,
/// [`DbError::DuplicateSlug`] when a regenerated slug collides, or any
/// pipeline error for the patched fields.
#[instrument(skip(store, patch))]
pub async fn update_event(
    store: &Store,
    event_id: &str,
    patch: EventPatch,
) -> Result<Event, DbError> {
    let id = ObjectId::parse_str(event_id).map_err(|_| DbError::NotFound)?;
    let database = store.database().await?;
    let events = database.collection::<EventRow>(EVENTS);

    let current = events
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(DbError::NotFound)?;
    let current = Event::from(current);
    let next = apply_event_patch(&current, &patch)?;
    let slug = next.slug.clone();

    let update = doc! { "$set": set_document(&current, &next, &patch) };

    let updated = events
        .find_one_and_update(doc! { "_id": id }, update)
        .return_document(ReturnDocument::After)
        .await;

    match updated {
        Ok(Some(row)) => {
            info!(slug = %slug, "event updated");
            Ok(Event::from(row))
        }
        // Deleted between the fetch and the update.
        Ok(None) => Err(DbError::NotFound),
        Err(err) if is_duplicate_key(&err) => Err(DbError::DuplicateSlug(slug)),
        Err(err) => Err(err.into()),
    }
}

/// Fetch an event by its unique slug. A miss is a valid empty result.
pub async fn find_event_by_slug(store: &Store, slug: &str) -> Result<Option<Event>, DbError> {
    let database = store.database().await?;
    let row = database
        .collection::<EventRow>(EVENTS)
        .find_one(doc! { "slug": slug })
        .await?;
    Ok(row.map(Event::from))
}

/// Report whether an event with the given identifier currently exists.
///
/// Identifiers that do not parse as ObjectIds cannot reference any
/// stored event and report `false`.
pub async fn event_exists(store: &Store, event_id: &str) -> Result<bool, DbError> {
    let Ok(id) = ObjectId::parse_str(event_id) else {
        return Ok(false);
    };

    let database = store.database().await?;
    let row = database
        .collection::<EventRow>(EVENTS)
        .find_one(doc! { "_id": id })
        .await?;
    Ok(row.is_some())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use model::Mode;

    fn stored_event() -> Event {
        let now = Utc::now();
        Event {
            id: "665f1f77bcf86cd799439011".into(),
            title: "Rust Meetup 2025".into(),
            slug: "rust-meetup-2025".into(),
            description: "An evening of talks".into(),
            overview: "Three talks, one break".into(),
            image: "https://example.com/banner.png".into(),
            venue: "Community Hall".into(),
            location: "Springfield".into(),
            date: "2025-03-05".into(),
            time: "9:30 AM".into(),
            mode: Mode::Offline,
            audience: "Rust developers".into(),
            agenda: vec!["Doors open".into(), "Talks".into()],
            organizer: "Springfield RUG".into(),
            tags: vec!["rust".into(), "meetup".into()],
            created_at: now,
            updated_at: now,
        }
    }

    fn set_keys(set: &Document) -> Vec<&str> {
        set.keys().map(String::as_str).collect()
    }

    #[test]
    fn update_writes_only_the_patched_fields() {
        let current = stored_event();
        let patch = EventPatch {
            venue: Some("Bigger Hall".into()),
            ..EventPatch::default()
        };
        let next = apply_event_patch(&current, &patch).expect("should validate");

        // A concurrent writer's commit to any other field survives this
        // update untouched.
        let set = set_document(&current, &next, &patch);
        assert_eq!(set_keys(&set), ["venue", "updatedAt"]);
        assert_eq!(set.get_str("venue").expect("venue"), "Bigger Hall");
    }

    #[test]
    fn changed_title_writes_the_regenerated_slug() {
        let current = stored_event();
        let patch = EventPatch {
            title: Some("Rust Meetup 2026".into()),
            ..EventPatch::default()
        };
        let next = apply_event_patch(&current, &patch).expect("should validate");

        let set = set_document(&current, &next, &patch);
        assert_eq!(set_keys(&set), ["title", "slug", "updatedAt"]);
        assert_eq!(set.get_str("slug").expect("slug"), "rust-meetup-2026");
    }

    #[test]
    fn identical_title_leaves_the_slug_unwritten() {
        let current = stored_event();
        let patch = EventPatch {
            title: Some(current.title.clone()),
            ..EventPatch::default()
        };
        let next = apply_event_patch(&current, &patch).expect("should validate");

        let set = set_document(&current, &next, &patch);
        assert_eq!(set_keys(&set), ["title", "updatedAt"]);
    }

    /// Driver write errors cannot be constructed by hand, so the
    /// code-11000 → [`DbError::DuplicateSlug`] mapping is exercised
    /// against a real deployment.
    #[tokio::test]
    #[ignore = "needs a live deployment; set MONGODB_URI and run with --ignored"]
    async fn duplicate_slug_is_reported_by_the_unique_index() {
        let store = Store::from_env().expect("MONGODB_URI must be set");
        let draft = EventDraft {
            title: format!("Duplicate Slug Check {}", ObjectId::new().to_hex()),
            description: "first of two identical titles".into(),
            overview: "duplicate insert".into(),
            image: "https://example.com/banner.png".into(),
            venue: "Community Hall".into(),
            location: "Springfield".into(),
            date: "2025-03-05".into(),
            time: "9:30 AM".into(),
            mode: "offline".into(),
            audience: "developers".into(),
            agenda: vec!["only item".into()],
            organizer: "QA".into(),
            tags: vec!["qa".into()],
        };

        let first = create_event(&store, draft.clone())
            .await
            .expect("first insert");
        let second = create_event(&store, draft).await;
        assert!(matches!(second, Err(DbError::DuplicateSlug(slug)) if slug == first.slug));
    }
}
