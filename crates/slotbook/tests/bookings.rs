mod common;

use common::{BOOKING_DAY, count, date, seeded_db, time};
use slotbook::{BookingRequest, BookingStore};

#[tokio::test]
async fn list_returns_all_bookings_ordered_by_date_then_slot() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    let bookings = store.list_bookings().await;
    assert_eq!(bookings.len(), 5);
    let slots: Vec<String> = bookings
        .iter()
        .map(|b| b.time_slot.format("%H:%M").to_string())
        .collect();
    assert_eq!(slots, ["16:00", "16:10", "16:20", "16:30", "16:40"]);
    assert_eq!(bookings[0].first_name, "Sally");
    assert_eq!(bookings[0].last_name, "Moon");
}

#[tokio::test]
async fn create_booking_in_free_slot_succeeds() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    let request = BookingRequest::new(6, date(BOOKING_DAY), time("16:50"));
    assert!(store.create_booking(&request).await.unwrap());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 6);
}

#[tokio::test]
async fn slots_are_keyed_by_date_and_time_together() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    // 16:00 is taken on the 15th but free on the 14th.
    let request = BookingRequest::new(6, date("2025-09-14"), time("16:00"));
    assert!(store.create_booking(&request).await.unwrap());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 6);
}

#[tokio::test]
async fn create_booking_in_taken_slot_is_a_conflict() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    // 16:00 already belongs to student 1.
    let request = BookingRequest::new(6, date(BOOKING_DAY), time("16:00"));
    let err = store.create_booking(&request).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 5);
}

#[tokio::test]
async fn create_second_booking_for_same_student_is_a_conflict() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    let request = BookingRequest::new(1, date(BOOKING_DAY), time("16:50"));
    let err = store.create_booking(&request).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 5);
}

#[tokio::test]
async fn create_booking_for_unknown_student_fails_validation() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    let request = BookingRequest::new(99, date(BOOKING_DAY), time("16:50"));
    let err = store.create_booking(&request).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn create_booking_with_missing_fields_fails_validation() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    let no_date = BookingRequest {
        student_id: 6,
        booking_date: None,
        time_slot: Some(time("16:50")),
    };
    assert!(store.create_booking(&no_date).await.unwrap_err().is_validation());

    let no_time = BookingRequest {
        student_id: 6,
        booking_date: Some(date(BOOKING_DAY)),
        time_slot: None,
    };
    assert!(store.create_booking(&no_time).await.unwrap_err().is_validation());

    let bad_id = BookingRequest::new(0, date(BOOKING_DAY), time("16:50"));
    assert!(store.create_booking(&bad_id).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn update_booking_into_another_students_slot_is_a_conflict() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    // Student 1 tries to take student 2's 16:10 slot.
    let request = BookingRequest::new(1, date(BOOKING_DAY), time("16:10"));
    let err = store.update_booking(&request).await.unwrap_err();
    assert!(err.is_conflict());

    // Nothing moved.
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 5);
    let slot: String = db
        .query_scalar(
            "SELECT TimeSlot FROM Bookings WHERE StudentId = 1",
            &slotbook::bind![],
        )
        .await
        .unwrap();
    assert_eq!(slot, "16:00");
}

#[tokio::test]
async fn update_booking_to_free_slot_succeeds() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    let request = BookingRequest::new(1, date(BOOKING_DAY), time("16:50"));
    assert!(store.update_booking(&request).await.unwrap());

    let slot: String = db
        .query_scalar(
            "SELECT TimeSlot FROM Bookings WHERE StudentId = 1",
            &slotbook::bind![],
        )
        .await
        .unwrap();
    assert_eq!(slot, "16:50");
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 5);
}

#[tokio::test]
async fn update_booking_keeping_own_slot_succeeds() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    // Re-asserting the current slot counts only the student's own row.
    let request = BookingRequest::new(1, date(BOOKING_DAY), time("16:00"));
    assert!(store.update_booking(&request).await.unwrap());
}

#[tokio::test]
async fn update_booking_without_existing_booking_is_a_conflict() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    let request = BookingRequest::new(6, date(BOOKING_DAY), time("16:50"));
    let err = store.update_booking(&request).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn delete_booking_removes_the_students_row() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    assert!(store.delete_booking(3).await.unwrap());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 4);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM Bookings WHERE StudentId = 3").await,
        0
    );
}

#[tokio::test]
async fn delete_booking_validates_the_student_id() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    assert!(store.delete_booking(0).await.unwrap_err().is_validation());
    assert!(store.delete_booking(-4).await.unwrap_err().is_validation());
    // Student 6 exists but has no booking.
    assert!(store.delete_booking(6).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn retrieve_booking_returns_joined_names() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    let booking = store.retrieve_booking_information(2).await.unwrap();
    assert_eq!(booking.student_id, 2);
    assert_eq!(booking.first_name, "Tom");
    assert_eq!(booking.last_name, "Reid");
    assert_eq!(booking.booking_date, date(BOOKING_DAY));
    assert_eq!(booking.time_slot, time("16:10"));
}

#[tokio::test]
async fn retrieve_booking_distinguishes_validation_from_not_found() {
    let db = seeded_db().await;
    let store = BookingStore::new(db);

    assert!(store
        .retrieve_booking_information(0)
        .await
        .unwrap_err()
        .is_validation());
    assert!(store
        .retrieve_booking_information(99)
        .await
        .unwrap_err()
        .is_validation());
    // Student 6 exists but holds no booking.
    assert!(store
        .retrieve_booking_information(6)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn clear_bookings_empties_the_table() {
    let db = seeded_db().await;
    let store = BookingStore::new(db.clone());

    assert!(store.clear_bookings().await.unwrap());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM Bookings").await, 0);
    assert!(store.list_bookings().await.is_empty());

    // Clearing an already-empty table still succeeds.
    assert!(store.clear_bookings().await.unwrap());
}
