//! Schema bootstrap.
//!
//! `initialize` creates every table the stores touch, retrying a few times
//! because a freshly opened file database can be briefly locked by another
//! process.

use crate::db::Database;
use crate::error::StoreResult;
use std::time::Duration;

const DDL: &str = "
CREATE TABLE IF NOT EXISTS Students (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL,
    DateOfBirth INTEGER NOT NULL,
    Class TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Parents (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ParentStudents (
    ParentId INTEGER NOT NULL REFERENCES Parents(Id) ON DELETE CASCADE,
    StudentId INTEGER NOT NULL REFERENCES Students(Id) ON DELETE CASCADE,
    Relationship TEXT NOT NULL,
    PRIMARY KEY (ParentId, StudentId)
);

CREATE TABLE IF NOT EXISTS Bookings (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    StudentId INTEGER NOT NULL REFERENCES Students(Id) ON DELETE CASCADE,
    BookingDate TEXT NOT NULL,
    TimeSlot TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Data (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    StudentId INTEGER NOT NULL REFERENCES Students(Id) ON DELETE CASCADE,
    Maths INTEGER NOT NULL,
    English INTEGER NOT NULL,
    Science INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Comments (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    StudentId INTEGER NOT NULL REFERENCES Students(Id) ON DELETE CASCADE,
    Note TEXT NOT NULL,
    DateAdded INTEGER NOT NULL
);
";

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY: Duration = Duration::from_millis(200);

/// Create all tables if they do not exist yet.
///
/// Retries up to three times with a doubling delay before giving up with
/// the last error.
pub async fn initialize(db: &Database) -> StoreResult<()> {
    let mut delay = BASE_DELAY;
    let mut attempt = 1;
    loop {
        match db.batch(DDL).await {
            Ok(()) => return Ok(()),
            Err(error) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(attempt, %error, "schema creation failed; retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(attempt, %error, "schema creation failed");
                return Err(error);
            }
        }
    }
}
