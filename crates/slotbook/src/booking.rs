//! Booking store: create, update, delete, list, and retrieve bookings.
//!
//! Validation and conflict checks run before any write, so a persisted
//! booking is always fully valid or the table is unchanged. Statement
//! faults on the write path are logged and reported as `Ok(false)`; bad or
//! conflicting input is raised as an error before the connection is touched.

use crate::bind;
use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::model::{self, Booking, BookingRequest};
use crate::validate;
use std::sync::Arc;

const LIST_SQL: &str = "SELECT b.Id AS Id, b.StudentId AS StudentId, \
     b.BookingDate AS BookingDate, b.TimeSlot AS TimeSlot, \
     s.FirstName AS FirstName, s.LastName AS LastName \
     FROM Bookings b INNER JOIN Students s ON s.Id = b.StudentId";

/// Create/update/delete/list/retrieve operations on booking records.
pub struct BookingStore {
    db: Arc<Database>,
}

impl BookingStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist a new booking.
    ///
    /// Returns `Ok(true)` iff exactly one row was inserted. Raises
    /// validation errors for bad fields and a conflict error when the slot
    /// or the student is already booked.
    pub async fn create_booking(&self, booking: &BookingRequest) -> StoreResult<bool> {
        match validate::validate_booking_information(&self.db, booking).await {
            Ok(()) => {}
            Err(error) if error.is_precondition() => return Err(error),
            Err(error) => {
                tracing::error!(student_id = booking.student_id, %error, "booking validation query failed");
                return Ok(false);
            }
        }
        if !validate::is_unique_booking(&self.db, booking, false).await {
            return Err(StoreError::conflict(
                "student or time slot already has a booking",
            ));
        }

        // Validation guarantees both fields are present.
        let (Some(date), Some(time)) = (booking.booking_date, booking.time_slot) else {
            return Err(StoreError::validation("valid date required"));
        };
        let result = self
            .db
            .execute(
                "INSERT INTO Bookings (StudentId, BookingDate, TimeSlot) VALUES (?1, ?2, ?3)",
                &bind![
                    booking.student_id,
                    model::encode_date(date),
                    model::encode_time(time)
                ],
            )
            .await;
        match result {
            Ok(affected) => {
                tracing::info!(
                    student_id = booking.student_id,
                    date = %model::encode_date(date),
                    time = %model::encode_time(time),
                    "booking created",
                );
                Ok(affected == 1)
            }
            Err(error) => {
                tracing::error!(student_id = booking.student_id, %error, "booking insert failed");
                Ok(false)
            }
        }
    }

    /// Move an existing booking to new fields, keyed by student id.
    ///
    /// Returns `Ok(true)` iff exactly one row was updated. Raises a
    /// conflict error when the student has no booking to update or the
    /// requested slot belongs to another student.
    pub async fn update_booking(&self, booking: &BookingRequest) -> StoreResult<bool> {
        match validate::validate_booking_information(&self.db, booking).await {
            Ok(()) => {}
            Err(error) if error.is_precondition() => return Err(error),
            Err(error) => {
                tracing::error!(student_id = booking.student_id, %error, "booking validation query failed");
                return Ok(false);
            }
        }
        if !validate::is_unique_booking(&self.db, booking, true).await {
            let existing: i64 = self
                .db
                .query_scalar(
                    "SELECT COUNT(*) FROM Bookings WHERE StudentId = ?1",
                    &bind![booking.student_id],
                )
                .await
                .unwrap_or(0);
            return if existing == 0 {
                Err(StoreError::conflict("no existing booking to update"))
            } else {
                Err(StoreError::conflict(
                    "requested slot is already booked by another student",
                ))
            };
        }

        let (Some(date), Some(time)) = (booking.booking_date, booking.time_slot) else {
            return Err(StoreError::validation("valid date required"));
        };
        let result = self
            .db
            .execute(
                "UPDATE Bookings SET BookingDate = ?1, TimeSlot = ?2 WHERE StudentId = ?3",
                &bind![
                    model::encode_date(date),
                    model::encode_time(time),
                    booking.student_id
                ],
            )
            .await;
        match result {
            Ok(affected) => Ok(affected == 1),
            Err(error) => {
                tracing::error!(student_id = booking.student_id, %error, "booking update failed");
                Ok(false)
            }
        }
    }

    /// Remove the booking owned by `student_id`.
    ///
    /// The id must be positive and must already own a booking. Returns
    /// `Ok(true)` iff exactly one row was removed.
    pub async fn delete_booking(&self, student_id: i64) -> StoreResult<bool> {
        if student_id <= 0 {
            return Err(StoreError::validation("valid student id required"));
        }
        let existing: i64 = match self
            .db
            .query_scalar(
                "SELECT COUNT(*) FROM Bookings WHERE StudentId = ?1",
                &bind![student_id],
            )
            .await
        {
            Ok(count) => count,
            Err(error) => {
                tracing::error!(student_id, %error, "booking lookup failed");
                return Ok(false);
            }
        };
        if existing == 0 {
            return Err(StoreError::validation(
                "no booking exists for the given student id",
            ));
        }

        let result = self
            .db
            .execute(
                "DELETE FROM Bookings WHERE StudentId = ?1",
                &bind![student_id],
            )
            .await;
        match result {
            Ok(affected) => {
                tracing::info!(student_id, "booking deleted");
                Ok(affected == 1)
            }
            Err(error) => {
                tracing::error!(student_id, %error, "booking delete failed");
                Ok(false)
            }
        }
    }

    /// All bookings joined with student display names, ordered by date then
    /// time slot. An empty store yields an empty list; read faults are
    /// logged and also yield an empty list.
    pub async fn list_bookings(&self) -> Vec<Booking> {
        let sql = format!("{LIST_SQL} ORDER BY b.BookingDate, b.TimeSlot");
        match self.db.query_as::<Booking>(&sql, &bind![]).await {
            Ok(bookings) => bookings,
            Err(error) => {
                tracing::error!(%error, "booking list query failed");
                Vec::new()
            }
        }
    }

    /// The booking owned by `student_id`, with cached display names.
    ///
    /// Raises a validation error for an invalid or unknown student and a
    /// not-found error when the student exists but holds no booking.
    pub async fn retrieve_booking_information(&self, student_id: i64) -> StoreResult<Booking> {
        if student_id <= 0 {
            return Err(StoreError::validation("valid student id required"));
        }
        let students: i64 = self
            .db
            .query_scalar(
                "SELECT COUNT(*) FROM Students WHERE Id = ?1",
                &bind![student_id],
            )
            .await?;
        if students != 1 {
            return Err(StoreError::validation("student id does not exist"));
        }

        let sql = format!("{LIST_SQL} WHERE b.StudentId = ?1");
        match self.db.query_opt_as::<Booking>(&sql, &bind![student_id]).await {
            Ok(Some(booking)) => Ok(booking),
            Ok(None) => Err(StoreError::not_found(format!(
                "no booking exists for student {student_id}"
            ))),
            Err(error) => {
                tracing::error!(student_id, %error, "booking retrieval failed");
                Err(StoreError::not_found(format!(
                    "no booking exists for student {student_id}"
                )))
            }
        }
    }

    /// Delete every booking row.
    ///
    /// Succeeds when the statement executes, whether or not any rows
    /// existed; statement faults are logged and reported as `Ok(false)`.
    pub async fn clear_bookings(&self) -> StoreResult<bool> {
        match self.db.execute("DELETE FROM Bookings", &bind![]).await {
            Ok(affected) => {
                tracing::info!(removed = affected, "bookings cleared");
                Ok(true)
            }
            Err(error) => {
                tracing::error!(%error, "clearing bookings failed");
                Ok(false)
            }
        }
    }
}
