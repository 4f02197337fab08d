//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use slotbook::{Database, bind, schema};
use std::sync::Arc;

pub const BOOKING_DAY: &str = "2025-09-15";

/// A fresh in-memory database with the full schema created.
pub async fn empty_db() -> Arc<Database> {
    let db = Arc::new(Database::in_memory().expect("open in-memory database"));
    schema::initialize(&db).await.expect("create schema");
    db
}

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

pub fn time(text: &str) -> NaiveTime {
    NaiveTime::parse_from_str(text, "%H:%M").unwrap()
}

pub async fn count(db: &Database, sql: &str) -> i64 {
    db.query_scalar(sql, &bind![]).await.expect("count query")
}

/// Six students; the first five each hold a booking on the same afternoon
/// at ten-minute intervals, the sixth has none.
pub async fn seeded_db() -> Arc<Database> {
    let db = empty_db().await;
    let students = [
        (1i64, "Sally", "Moon", 20140307i64, "3B"),
        (2, "Tom", "Reid", 20140921, "3B"),
        (3, "Jo", "Hart", 20131102, "4A"),
        (4, "Mia", "Cole", 20140515, "3B"),
        (5, "Ben", "Shaw", 20130228, "4A"),
        (6, "Ada", "Lane", 20140101, "4A"),
    ];
    for (id, first, last, dob, class) in students {
        db.execute(
            "INSERT INTO Students (Id, FirstName, LastName, DateOfBirth, Class) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            &bind![id, first, last, dob, class],
        )
        .await
        .expect("seed student");
    }
    for (student_id, slot) in [
        (1i64, "16:00"),
        (2, "16:10"),
        (3, "16:20"),
        (4, "16:30"),
        (5, "16:40"),
    ] {
        db.execute(
            "INSERT INTO Bookings (StudentId, BookingDate, TimeSlot) VALUES (?1, ?2, ?3)",
            &bind![student_id, BOOKING_DAY, slot],
        )
        .await
        .expect("seed booking");
    }
    db
}

/// Three students and three parents linked by five relationship rows, two
/// of which belong to Sally Moon.
pub async fn family_db() -> Arc<Database> {
    let db = empty_db().await;
    let students = [
        (1i64, "Sally", "Moon", 20140307i64, "3B"),
        (2, "Tom", "Reid", 20140921, "3B"),
        (3, "Jo", "Hart", 20131102, "4A"),
    ];
    for (id, first, last, dob, class) in students {
        db.execute(
            "INSERT INTO Students (Id, FirstName, LastName, DateOfBirth, Class) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            &bind![id, first, last, dob, class],
        )
        .await
        .expect("seed student");
    }
    for (id, first, last) in [
        (1i64, "Anna", "Moon"),
        (2, "David", "Moon"),
        (3, "Clare", "Reid"),
    ] {
        db.execute(
            "INSERT INTO Parents (Id, FirstName, LastName) VALUES (?1, ?2, ?3)",
            &bind![id, first, last],
        )
        .await
        .expect("seed parent");
    }
    for (parent_id, student_id, relationship) in [
        (1i64, 1i64, "Mother"),
        (2, 1, "Father"),
        (3, 2, "Mother"),
        (1, 3, "Guardian"),
        (2, 3, "Guardian"),
    ] {
        db.execute(
            "INSERT INTO ParentStudents (ParentId, StudentId, Relationship) \
             VALUES (?1, ?2, ?3)",
            &bind![parent_id, student_id, relationship],
        )
        .await
        .expect("seed relationship");
    }
    db
}
