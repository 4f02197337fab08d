//! Record types and the text/integer codecs the schema stores them with.
//!
//! Booking dates are persisted as `yyyy-MM-dd` text, time slots as `HH:mm`
//! text, and birth dates as `yyyyMMdd` integers.

use crate::error::{StoreError, StoreResult};
use crate::row::FromRow;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Storage format for booking dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for time slots.
pub const TIME_FORMAT: &str = "%H:%M";

/// Encode a booking date for storage.
pub fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decode a stored booking date.
pub fn decode_date(text: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| StoreError::decode("BookingDate", format!("'{text}': {e}")))
}

/// Encode a time slot for storage.
pub fn encode_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Decode a stored time slot.
pub fn decode_time(text: &str) -> StoreResult<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|e| StoreError::decode("TimeSlot", format!("'{text}': {e}")))
}

/// Encode a birth date as a `yyyyMMdd` integer.
pub fn encode_birth_date(date: NaiveDate) -> i64 {
    use chrono::Datelike;
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Decode a `yyyyMMdd` integer birth date.
pub fn decode_birth_date(encoded: i64) -> StoreResult<NaiveDate> {
    let year = i32::try_from(encoded / 10_000)
        .map_err(|_| StoreError::decode("DateOfBirth", format!("{encoded} out of range")))?;
    let month = u32::try_from((encoded / 100) % 100).unwrap_or(0);
    let day = u32::try_from(encoded % 100).unwrap_or(0);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| StoreError::decode("DateOfBirth", format!("{encoded} is not a valid date")))
}

/// A booking create/update request.
///
/// Requests may carry partial data; the conflict validator rejects them
/// before anything is persisted. A persisted booking always has both a date
/// and a time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub student_id: i64,
    pub booking_date: Option<NaiveDate>,
    pub time_slot: Option<NaiveTime>,
}

impl BookingRequest {
    pub fn new(student_id: i64, booking_date: NaiveDate, time_slot: NaiveTime) -> Self {
        Self {
            student_id,
            booking_date: Some(booking_date),
            time_slot: Some(time_slot),
        }
    }
}

/// A persisted booking, joined with the student's display names on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub student_id: i64,
    pub booking_date: NaiveDate,
    pub time_slot: NaiveTime,
    pub first_name: String,
    pub last_name: String,
}

impl FromRow for Booking {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        let date_text: String = row.get("BookingDate")?;
        let time_text: String = row.get("TimeSlot")?;
        Ok(Self {
            id: row.get("Id")?,
            student_id: row.get("StudentId")?,
            booking_date: decode_date(&date_text)?,
            time_slot: decode_time(&time_text)?,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
        })
    }
}

/// A persisted student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub class_name: String,
}

impl FromRow for Student {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        let dob: i64 = row.get("DateOfBirth")?;
        Ok(Self {
            id: row.get("Id")?,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
            date_of_birth: decode_birth_date(dob)?,
            class_name: row.get("Class")?,
        })
    }
}

/// A student to insert, with optional links to existing parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub class_name: String,
    /// (parent id, relationship label) rows inserted in the same transaction.
    pub guardians: Vec<GuardianLink>,
}

/// Link from a new student to an existing parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianLink {
    pub parent_id: i64,
    pub relationship: String,
}

/// A persisted parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl FromRow for Parent {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        Ok(Self {
            id: row.get("Id")?,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
        })
    }
}

/// A parent to insert, with links to existing students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParent {
    pub first_name: String,
    pub last_name: String,
    /// (student id, relationship label) rows inserted in the same transaction.
    pub children: Vec<ChildLink>,
}

/// Link from a new parent to an existing student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    pub student_id: i64,
    pub relationship: String,
}

/// A parent-student relationship row (composite key, with label metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentStudentRelationship {
    pub parent_id: i64,
    pub student_id: i64,
    pub relationship: String,
}

impl FromRow for ParentStudentRelationship {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        Ok(Self {
            parent_id: row.get("ParentId")?,
            student_id: row.get("StudentId")?,
            relationship: row.get("Relationship")?,
        })
    }
}

/// Persisted academic scores for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    pub id: i64,
    pub student_id: i64,
    pub maths: i64,
    pub english: i64,
    pub science: i64,
}

impl FromRow for DataRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        Ok(Self {
            id: row.get("Id")?,
            student_id: row.get("StudentId")?,
            maths: row.get("Maths")?,
            english: row.get("English")?,
            science: row.get("Science")?,
        })
    }
}

/// Academic scores to insert for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewData {
    pub student_id: i64,
    pub maths: i64,
    pub english: i64,
    pub science: i64,
}

/// A persisted teacher comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub student_id: i64,
    pub note: String,
    pub date_added: NaiveDate,
}

impl FromRow for CommentRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        let added: i64 = row.get("DateAdded")?;
        Ok(Self {
            id: row.get("Id")?,
            student_id: row.get("StudentId")?,
            note: row.get("Note")?,
            date_added: decode_birth_date(added)
                .map_err(|_| StoreError::decode("DateAdded", format!("{added}")))?,
        })
    }
}

/// A teacher comment to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub student_id: i64,
    pub note: String,
    pub date_added: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let text = encode_date(date);
        assert_eq!(text, "2025-09-15");
        assert_eq!(decode_date(&text).unwrap(), date);
    }

    #[test]
    fn time_round_trip() {
        let time = NaiveTime::from_hms_opt(16, 10, 0).unwrap();
        let text = encode_time(time);
        assert_eq!(text, "16:10");
        assert_eq!(decode_time(&text).unwrap(), time);
    }

    #[test]
    fn birth_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 7).unwrap();
        let encoded = encode_birth_date(date);
        assert_eq!(encoded, 20140307);
        assert_eq!(decode_birth_date(encoded).unwrap(), date);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_date("15/09/2025").is_err());
        assert!(decode_time("4pm").is_err());
        assert!(decode_birth_date(20141399).is_err());
    }
}
