//! Write-time validation rules — run these immediately before a record
//! is persisted.
//!
//! Rules are evaluated in a fixed order and short-circuit on the first
//! violation; a draft either becomes a `Validated*` value or an error,
//! never anything in between. Updates follow the dirty-field policy:
//! only fields present in the patch are re-validated, and the slug is
//! regenerated only when the title actually changes.

use crate::directory::EventDirectory;
use crate::error::ValidationError;
use crate::models::{
    BookingDraft, Event, EventDraft, EventPatch, Mode, ValidatedBooking, ValidatedEvent,
};
use crate::normalize::{canonical_date, canonical_time, normalize_email, slugify};

/// Trim a required scalar field, rejecting empty values.
fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Validate and normalize an event draft for creation.
///
/// # Errors
/// - [`ValidationError::MissingField`] for an absent/empty scalar.
/// - [`ValidationError::InvalidMode`] for an unknown `mode`.
/// - [`ValidationError::EmptyCollection`] for an empty `agenda`/`tags`.
/// - [`ValidationError::InvalidDate`] / [`ValidationError::InvalidTime`]
///   for uncanonicalizable date/time inputs.
///
/// Slug uniqueness is *not* checked here — the storage layer's unique
/// index is the source of truth for collisions.
pub fn validate_event(draft: &EventDraft) -> Result<ValidatedEvent, ValidationError> {
    // -----------------------------------------------------------------------
    // 1. Required scalars, in the order callers see them surfaced.
    // -----------------------------------------------------------------------
    let title = required(&draft.title, "title")?;
    let description = required(&draft.description, "description")?;
    let overview = required(&draft.overview, "overview")?;
    // Presence only. The stored image keeps the caller's exact string;
    // a URI or path is not ours to reshape.
    if draft.image.trim().is_empty() {
        return Err(ValidationError::MissingField("image"));
    }
    let image = draft.image.clone();
    let venue = required(&draft.venue, "venue")?;
    let location = required(&draft.location, "location")?;
    let date = required(&draft.date, "date")?;
    let time = required(&draft.time, "time")?;
    let audience = required(&draft.audience, "audience")?;
    let organizer = required(&draft.organizer, "organizer")?;

    // -----------------------------------------------------------------------
    // 2. Mode must be a known enum value.
    // -----------------------------------------------------------------------
    let mode_input = draft.mode.trim();
    let mode = mode_input
        .parse::<Mode>()
        .map_err(|_| ValidationError::InvalidMode(mode_input.to_owned()))?;

    // -----------------------------------------------------------------------
    // 3. Sequence fields must be non-empty.
    // -----------------------------------------------------------------------
    if draft.agenda.is_empty() {
        return Err(ValidationError::EmptyCollection("agenda"));
    }
    if draft.tags.is_empty() {
        return Err(ValidationError::EmptyCollection("tags"));
    }

    // -----------------------------------------------------------------------
    // 4. Derive the slug — the title is always "new" on creation.
    // -----------------------------------------------------------------------
    let slug = slugify(&title);

    // -----------------------------------------------------------------------
    // 5–6. Canonicalize date and time.
    // -----------------------------------------------------------------------
    let date = canonical_date(&date).ok_or(ValidationError::InvalidDate(date))?;
    let time = canonical_time(&time).ok_or(ValidationError::InvalidTime(time))?;

    Ok(ValidatedEvent {
        title,
        slug,
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        agenda: draft.agenda.clone(),
        organizer,
        tags: draft.tags.clone(),
    })
}

/// Re-validate an existing event against a partial update.
///
/// Fields absent from the patch keep their stored (already canonical)
/// values and are not re-checked. The slug is regenerated only when the
/// patch carries a title different from the stored one.
pub fn apply_event_patch(
    current: &Event,
    patch: &EventPatch,
) -> Result<ValidatedEvent, ValidationError> {
    let mut next = ValidatedEvent::from(current);

    if let Some(title) = &patch.title {
        let title = required(title, "title")?;
        if title != current.title {
            next.slug = slugify(&title);
        }
        next.title = title;
    }
    if let Some(description) = &patch.description {
        next.description = required(description, "description")?;
    }
    if let Some(overview) = &patch.overview {
        next.overview = required(overview, "overview")?;
    }
    if let Some(image) = &patch.image {
        if image.trim().is_empty() {
            return Err(ValidationError::MissingField("image"));
        }
        next.image = image.clone();
    }
    if let Some(venue) = &patch.venue {
        next.venue = required(venue, "venue")?;
    }
    if let Some(location) = &patch.location {
        next.location = required(location, "location")?;
    }
    if let Some(audience) = &patch.audience {
        next.audience = required(audience, "audience")?;
    }
    if let Some(organizer) = &patch.organizer {
        next.organizer = required(organizer, "organizer")?;
    }
    if let Some(mode) = &patch.mode {
        let mode_input = mode.trim();
        next.mode = mode_input
            .parse::<Mode>()
            .map_err(|_| ValidationError::InvalidMode(mode_input.to_owned()))?;
    }
    if let Some(agenda) = &patch.agenda {
        if agenda.is_empty() {
            return Err(ValidationError::EmptyCollection("agenda"));
        }
        next.agenda = agenda.clone();
    }
    if let Some(tags) = &patch.tags {
        if tags.is_empty() {
            return Err(ValidationError::EmptyCollection("tags"));
        }
        next.tags = tags.clone();
    }
    if let Some(date) = &patch.date {
        let date = required(date, "date")?;
        next.date = canonical_date(&date).ok_or(ValidationError::InvalidDate(date))?;
    }
    if let Some(time) = &patch.time {
        let time = required(time, "time")?;
        next.time = canonical_time(&time).ok_or(ValidationError::InvalidTime(time))?;
    }

    Ok(next)
}

/// Validate and normalize a booking draft, including the referential
/// check against the event directory.
///
/// # Errors
/// - [`ValidationError::MissingField`] for an empty email or event id.
/// - [`ValidationError::InvalidEmail`] for a malformed email.
/// - [`ValidationError::DanglingReference`] when the event is confirmed
///   missing.
/// - [`ValidationError::ValidationUnavailable`] when the existence check
///   itself could not run — the caller can retry, unlike a confirmed
///   dangling reference.
pub async fn validate_booking(
    draft: &BookingDraft,
    directory: &impl EventDirectory,
) -> Result<ValidatedBooking, ValidationError> {
    // 1. Email: required, trimmed, lowercased, shaped like local@domain.tld.
    let email_input = draft.email.trim();
    if email_input.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    let email = normalize_email(email_input)
        .ok_or_else(|| ValidationError::InvalidEmail(email_input.to_owned()))?;

    // 2. Event reference: required.
    let event_id = draft.event_id.trim();
    if event_id.is_empty() {
        return Err(ValidationError::MissingField("eventId"));
    }

    // 3. The reference must resolve right now. This is advisory fast-fail:
    //    the event can still vanish between this check and the insert.
    match directory.event_exists(event_id).await {
        Ok(true) => Ok(ValidatedBooking {
            event_id: event_id.to_owned(),
            email,
        }),
        Ok(false) => Err(ValidationError::DanglingReference(event_id.to_owned())),
        Err(unavailable) => Err(ValidationError::ValidationUnavailable(
            unavailable.0,
        )),
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDirectory;
    use chrono::Utc;

    fn draft() -> EventDraft {
        EventDraft {
            title: "Rust Meetup 2025".into(),
            description: "An evening of talks".into(),
            overview: "Three talks, one break".into(),
            image: "https://example.com/banner.png".into(),
            venue: "Community Hall".into(),
            location: "Springfield".into(),
            date: "March 5, 2025".into(),
            time: "9:30 AM".into(),
            mode: "offline".into(),
            audience: "Rust developers".into(),
            agenda: vec!["Doors open".into(), "Talks".into()],
            organizer: "Springfield RUG".into(),
            tags: vec!["rust".into(), "meetup".into()],
        }
    }

    fn stored_event() -> Event {
        let validated = validate_event(&draft()).expect("fixture draft should validate");
        let now = Utc::now();
        Event {
            id: "665f1f77bcf86cd799439011".into(),
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

    // ------ event creation ------

    #[test]
    fn valid_draft_is_fully_canonicalized() {
        let validated = validate_event(&draft()).expect("should validate");
        assert_eq!(validated.slug, "rust-meetup-2025");
        assert_eq!(validated.date, "2025-03-05");
        assert_eq!(validated.time, "9:30 AM");
        assert_eq!(validated.mode, Mode::Offline);
    }

    #[test]
    fn missing_fields_are_reported_in_rule_order() {
        let mut d = draft();
        d.title = "   ".into();
        d.venue = String::new();
        // Title is checked before venue, so title wins.
        assert_eq!(
            validate_event(&d),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn whitespace_only_field_counts_as_missing() {
        let mut d = draft();
        d.organizer = "  \t ".into();
        assert_eq!(
            validate_event(&d),
            Err(ValidationError::MissingField("organizer"))
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut d = draft();
        d.mode = "in-person".into();
        assert!(matches!(
            validate_event(&d),
            Err(ValidationError::InvalidMode(m)) if m == "in-person"
        ));
    }

    #[test]
    fn empty_agenda_and_tags_are_rejected() {
        let mut d = draft();
        d.agenda.clear();
        assert_eq!(
            validate_event(&d),
            Err(ValidationError::EmptyCollection("agenda"))
        );

        let mut d = draft();
        d.tags.clear();
        assert_eq!(
            validate_event(&d),
            Err(ValidationError::EmptyCollection("tags"))
        );
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let mut d = draft();
        d.date = "not-a-date".into();
        assert!(matches!(
            validate_event(&d),
            Err(ValidationError::InvalidDate(v)) if v == "not-a-date"
        ));
    }

    #[test]
    fn out_of_range_time_is_rejected() {
        let mut d = draft();
        d.time = "25:00".into();
        assert!(matches!(
            validate_event(&d),
            Err(ValidationError::InvalidTime(v)) if v == "25:00"
        ));
    }

    #[test]
    fn scalar_fields_are_trimmed() {
        let mut d = draft();
        d.title = "  Rust Meetup 2025  ".into();
        d.venue = " Community Hall ".into();
        let validated = validate_event(&d).expect("should validate");
        assert_eq!(validated.title, "Rust Meetup 2025");
        assert_eq!(validated.venue, "Community Hall");
    }

    #[test]
    fn image_is_presence_checked_but_stored_verbatim() {
        let mut d = draft();
        d.image = "  /banners/rust.png  ".into();
        let validated = validate_event(&d).expect("should validate");
        assert_eq!(validated.image, "  /banners/rust.png  ");

        let mut d = draft();
        d.image = "   ".into();
        assert_eq!(
            validate_event(&d),
            Err(ValidationError::MissingField("image"))
        );
    }

    // ------ event update (dirty-field policy) ------

    #[test]
    fn patch_of_unrelated_field_keeps_slug_and_date_untouched() {
        let current = stored_event();
        let patch = EventPatch {
            venue: Some("Bigger Hall".into()),
            ..EventPatch::default()
        };

        let next = apply_event_patch(&current, &patch).expect("should validate");
        assert_eq!(next.venue, "Bigger Hall");
        assert_eq!(next.slug, current.slug);
        assert_eq!(next.date, current.date);
        assert_eq!(next.title, current.title);
    }

    #[test]
    fn changed_title_regenerates_the_slug() {
        let current = stored_event();
        let patch = EventPatch {
            title: Some("Rust Meetup 2026".into()),
            ..EventPatch::default()
        };

        let next = apply_event_patch(&current, &patch).expect("should validate");
        assert_eq!(next.slug, "rust-meetup-2026");
    }

    #[test]
    fn identical_title_keeps_the_existing_slug() {
        let current = stored_event();
        let patch = EventPatch {
            title: Some(current.title.clone()),
            ..EventPatch::default()
        };

        let next = apply_event_patch(&current, &patch).expect("should validate");
        assert_eq!(next.slug, current.slug);
    }

    #[test]
    fn patched_image_is_stored_verbatim() {
        let current = stored_event();
        let patch = EventPatch {
            image: Some(" /new/banner.png ".into()),
            ..EventPatch::default()
        };

        let next = apply_event_patch(&current, &patch).expect("should validate");
        assert_eq!(next.image, " /new/banner.png ");
    }

    #[test]
    fn patched_date_is_canonicalized_and_invalid_patch_rejected() {
        let current = stored_event();

        let ok = EventPatch {
            date: Some("April 1, 2026".into()),
            ..EventPatch::default()
        };
        let next = apply_event_patch(&current, &ok).expect("should validate");
        assert_eq!(next.date, "2026-04-01");

        let bad = EventPatch {
            time: Some("25:00".into()),
            ..EventPatch::default()
        };
        assert!(matches!(
            apply_event_patch(&current, &bad),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    // ------ booking creation ------

    fn booking_draft() -> BookingDraft {
        BookingDraft {
            event_id: "665f1f77bcf86cd799439011".into(),
            email: "  Alice@Example.COM ".into(),
        }
    }

    #[tokio::test]
    async fn booking_email_is_normalized_and_reference_checked() {
        let directory = MockDirectory::exists();
        let validated = validate_booking(&booking_draft(), &directory)
            .await
            .expect("should validate");

        assert_eq!(validated.email, "alice@example.com");
        assert_eq!(directory.call_count(), 1);
        assert_eq!(
            directory.calls.lock().unwrap()[0],
            "665f1f77bcf86cd799439011"
        );
    }

    #[tokio::test]
    async fn missing_email_is_reported_before_the_reference_is_touched() {
        let directory = MockDirectory::exists();
        let draft = BookingDraft {
            event_id: "665f1f77bcf86cd799439011".into(),
            email: "  ".into(),
        };

        assert_eq!(
            validate_booking(&draft, &directory).await,
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let directory = MockDirectory::exists();
        let draft = BookingDraft {
            event_id: "665f1f77bcf86cd799439011".into(),
            email: "not-an-email".into(),
        };

        assert!(matches!(
            validate_booking(&draft, &directory).await,
            Err(ValidationError::InvalidEmail(v)) if v == "not-an-email"
        ));
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_event_id_is_rejected() {
        let directory = MockDirectory::exists();
        let draft = BookingDraft {
            event_id: String::new(),
            email: "alice@example.com".into(),
        };

        assert_eq!(
            validate_booking(&draft, &directory).await,
            Err(ValidationError::MissingField("eventId"))
        );
    }

    #[tokio::test]
    async fn confirmed_missing_event_is_a_dangling_reference() {
        let directory = MockDirectory::missing();

        assert!(matches!(
            validate_booking(&booking_draft(), &directory).await,
            Err(ValidationError::DanglingReference(id)) if id == "665f1f77bcf86cd799439011"
        ));
    }

    #[tokio::test]
    async fn failed_existence_check_is_not_a_dangling_reference() {
        let directory = MockDirectory::unavailable("server selection timed out");

        assert!(matches!(
            validate_booking(&booking_draft(), &directory).await,
            Err(ValidationError::ValidationUnavailable(cause))
                if cause.contains("server selection timed out")
        ));
    }
}
