//! Read-side search over students joined with their academic records.
//!
//! Every query projects the same denormalized row: the student plus any
//! academic scores and teacher comment attached to them. Read faults are
//! logged and surface as an empty result, never an error.

use crate::bind;
use crate::catalog::Table;
use crate::criteria::{self, Criterion};
use crate::db::Database;
use crate::error::StoreResult;
use crate::model::decode_birth_date;
use crate::row::FromRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PROJECTION: &str = "SELECT s.Id AS Id, s.FirstName AS FirstName, \
     s.LastName AS LastName, s.DateOfBirth AS DateOfBirth, s.Class AS Class, \
     d.Maths AS Maths, d.English AS English, d.Science AS Science, \
     c.Note AS Note, c.DateAdded AS DateAdded";

const JOINS: &str = "LEFT JOIN Data d ON d.StudentId = s.Id \
     LEFT JOIN Comments c ON c.StudentId = s.Id";

/// One student with whatever scores and comment exist for them.
///
/// The joined columns are optional because a student may have no data row
/// or no comment yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRow {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub class_name: String,
    pub maths: Option<i64>,
    pub english: Option<i64>,
    pub science: Option<i64>,
    pub note: Option<String>,
    pub comment_date: Option<NaiveDate>,
}

impl FromRow for SearchRow {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self> {
        let dob: i64 = row.get("DateOfBirth")?;
        let added: Option<i64> = row.get("DateAdded")?;
        Ok(Self {
            student_id: row.get("Id")?,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
            date_of_birth: decode_birth_date(dob)?,
            class_name: row.get("Class")?,
            maths: row.get("Maths")?,
            english: row.get("English")?,
            science: row.get("Science")?,
            note: row.get("Note")?,
            comment_date: added.map(decode_birth_date).transpose()?,
        })
    }
}

/// Read-only search queries over the student tables.
pub struct SearchStore {
    db: Arc<Database>,
}

impl SearchStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every student joined with their scores and comment, ordered by
    /// last name then first name.
    pub async fn get_all_search_data(&self) -> Vec<SearchRow> {
        let sql = format!(
            "{PROJECTION} FROM Students s {JOINS} ORDER BY s.LastName, s.FirstName"
        );
        match self.db.query_as::<SearchRow>(&sql, &bind![]).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(%error, "search query failed");
                Vec::new()
            }
        }
    }

    /// Students whose first name, last name, or class contains `keyword`.
    ///
    /// The keyword is always bound as a parameter, never rendered into the
    /// statement text.
    pub async fn search_by_keyword(&self, keyword: &str) -> Vec<SearchRow> {
        let pattern = format!("%{keyword}%");
        let sql = format!(
            "{PROJECTION} FROM Students s {JOINS} \
             WHERE s.FirstName LIKE ?1 OR s.LastName LIKE ?1 OR s.Class LIKE ?1 \
             ORDER BY s.LastName, s.FirstName"
        );
        match self.db.query_as::<SearchRow>(&sql, &bind![pattern]).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(keyword, %error, "keyword search failed");
                Vec::new()
            }
        }
    }

    /// Students matching every criterion, joined with their scores and
    /// comment.
    ///
    /// An empty criteria collection matches nothing. Criteria are filtered
    /// against the student columns; unknown fields are dropped the same way
    /// the mutation paths drop them.
    pub async fn search_by_criteria(&self, criteria: &[Criterion]) -> Vec<SearchRow> {
        if criteria.is_empty() {
            return Vec::new();
        }
        let clause = criteria::render(Table::Students, criteria);
        // Filter before joining so unqualified column names stay unambiguous.
        let sql = format!(
            "{PROJECTION} FROM (SELECT * FROM Students {}) s {JOINS} \
             ORDER BY s.LastName, s.FirstName",
            clause.sql()
        );
        match self.db.query_as::<SearchRow>(&sql, clause.params()).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(%error, "criteria search failed");
                Vec::new()
            }
        }
    }

    /// The denormalized row for one student, if they exist.
    pub async fn get_student_search_data(&self, student_id: i64) -> Option<SearchRow> {
        let sql = format!("{PROJECTION} FROM Students s {JOINS} WHERE s.Id = ?1");
        match self
            .db
            .query_opt_as::<SearchRow>(&sql, &bind![student_id])
            .await
        {
            Ok(row) => row,
            Err(error) => {
                tracing::error!(student_id, %error, "student lookup failed");
                None
            }
        }
    }
}
