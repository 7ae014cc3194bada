//! Booking repository operations.

use futures::future::Either;
use futures::{stream, Stream, StreamExt};
use model::{validate_booking, Booking, BookingDraft, ValidationError};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use tracing::{info, instrument};

use crate::models::BookingRow;
use crate::mongo::{Store, BOOKINGS};
use crate::DbError;

/// Validate and persist a new booking.
///
/// The pipeline runs the referential check against the events
/// collection through the store itself; the check is advisory
/// fast-fail, since the event can still vanish before the insert lands.
///
/// # Errors
/// [`ValidationError::DanglingReference`] when the event is confirmed
/// missing, [`ValidationError::ValidationUnavailable`] when the check
/// could not run, plus the email/field rules.
#[instrument(skip(store, draft), fields(event_id = %draft.event_id))]
pub async fn create_booking(store: &Store, draft: BookingDraft) -> Result<Booking, DbError> {
    let validated = validate_booking(&draft, store).await?;

    // The existence check resolved this id, so it parses; re-verified
    // here rather than assumed.
    let event_id = ObjectId::parse_str(&validated.event_id).map_err(|_| {
        DbError::Validation(ValidationError::DanglingReference(validated.event_id.clone()))
    })?;

    let database = store.database().await?;
    let now = DateTime::now();
    let row = BookingRow {
        id: ObjectId::new(),
        event_id,
        email: validated.email,
        created_at: now,
        updated_at: now,
    };

    database
        .collection::<BookingRow>(BOOKINGS)
        .insert_one(&row)
        .await?;

    info!(booking_id = %row.id, "booking created");
    Ok(Booking::from(row))
}

/// All bookings for one event, as a lazy finite stream backed by a
/// cursor over the `eventId` index. Re-invoking runs a fresh query and
/// restarts the listing.
///
/// An identifier that parses as no ObjectId yields an empty stream.
pub async fn find_bookings_by_event(
    store: &Store,
    event_id: &str,
) -> Result<impl Stream<Item = Result<Booking, DbError>>, DbError> {
    let Ok(id) = ObjectId::parse_str(event_id) else {
        return Ok(Either::Right(stream::empty()));
    };

    let database = store.database().await?;
    let cursor = database
        .collection::<BookingRow>(BOOKINGS)
        .find(doc! { "eventId": id })
        .await?;

    Ok(Either::Left(
        cursor.map(|row| row.map(Booking::from).map_err(DbError::from)),
    ))
}
