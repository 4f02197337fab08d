//! Booking conflict validation.
//!
//! Both checks run before any write: field validation fails fast with a
//! descriptive error, and the uniqueness probe answers whether the candidate
//! booking would violate the one-booking-per-student or one-booking-per-slot
//! invariant.

use crate::bind;
use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::model::{self, BookingRequest};

/// Validate a candidate booking's fields.
///
/// The student id must be positive and resolve to exactly one student row,
/// and both the date and the time slot must be present.
pub async fn validate_booking_information(
    db: &Database,
    booking: &BookingRequest,
) -> StoreResult<()> {
    if booking.student_id <= 0 {
        return Err(StoreError::validation("valid student id required"));
    }
    let students: i64 = db
        .query_scalar(
            "SELECT COUNT(*) FROM Students WHERE Id = ?1",
            &bind![booking.student_id],
        )
        .await?;
    if students != 1 {
        return Err(StoreError::validation("student id does not exist"));
    }
    if booking.booking_date.is_none() {
        return Err(StoreError::validation("valid date required"));
    }
    if booking.time_slot.is_none() {
        return Err(StoreError::validation("valid time required"));
    }
    Ok(())
}

/// Whether the candidate booking is free of slot and duplicate conflicts.
///
/// Counts existing rows occupying the requested (date, time) slot or
/// belonging to the requesting student; a row matching both predicates
/// counts once. A create expects no matches at all. An update expects
/// exactly one match (the student's own current row), so both a slot taken
/// by someone else and a duplicate row push the count off one.
///
/// A failed probe is reported as a conflict rather than risking a
/// double-booked slot.
pub async fn is_unique_booking(db: &Database, booking: &BookingRequest, is_update: bool) -> bool {
    let (Some(date), Some(time)) = (booking.booking_date, booking.time_slot) else {
        return false;
    };

    let result: StoreResult<i64> = db
        .query_scalar(
            "SELECT COUNT(*) FROM Bookings \
             WHERE (BookingDate = ?1 AND TimeSlot = ?2) OR StudentId = ?3",
            &bind![
                model::encode_date(date),
                model::encode_time(time),
                booking.student_id
            ],
        )
        .await;

    match result {
        Ok(matches) => {
            let expected = if is_update { 1 } else { 0 };
            matches == expected
        }
        Err(error) => {
            tracing::error!(
                student_id = booking.student_id,
                %error,
                "uniqueness probe failed; treating booking as conflicting",
            );
            false
        }
    }
}
