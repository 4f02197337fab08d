//! # slotbook
//!
//! A SQLite-backed data-access layer for parent-teacher meeting bookings.
//!
//! ## Features
//!
//! - **Conflict-safe bookings**: every write is validated first, so a slot is
//!   never double-booked and a student never holds two bookings
//! - **Allow-listed dynamic SQL**: table and column names come from a static
//!   schema catalog; caller values are always bound, never rendered
//! - **Criteria queries**: `(field, operator, value)` filters compiled into
//!   parameterized WHERE clauses for search and bulk delete
//! - **Transactional record mutations**: multi-table inserts and sparse
//!   partial updates commit all-or-nothing
//! - **Type-safe mapping**: Row → Struct via the `FromRow` trait
//!
//! ## Usage
//!
//! ```ignore
//! use slotbook::{BookingStore, BookingRequest, Database, schema};
//! use std::sync::Arc;
//!
//! let db = Arc::new(Database::open("school.db")?);
//! schema::initialize(&db).await?;
//!
//! let bookings = BookingStore::new(db.clone());
//! bookings
//!     .create_booking(&BookingRequest::new(student_id, date, time))
//!     .await?;
//! ```

pub mod booking;
pub mod catalog;
pub mod changeset;
pub mod criteria;
pub mod db;
pub mod error;
pub mod model;
pub mod param;
pub mod records;
pub mod row;
pub mod schema;
pub mod search;
pub mod validate;

pub use booking::BookingStore;
pub use catalog::{Table, is_valid_field, is_valid_table};
pub use changeset::ChangeSet;
pub use criteria::{Criterion, Op, WhereClause, build_where_clause};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use model::{
    Booking, BookingRequest, ChildLink, CommentRecord, DataRecord, GuardianLink, NewComment,
    NewData, NewParent, NewStudent, Parent, ParentStudentRelationship, Student,
};
pub use param::{Param, ParamList};
pub use records::{CommentUpdate, DataUpdate, ParentUpdate, RecordStore, StudentUpdate};
pub use row::FromRow;
pub use search::{SearchRow, SearchStore};
