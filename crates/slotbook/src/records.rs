//! Multi-table record mutations.
//!
//! Parent, student, and academic-record writes frequently touch more than
//! one table; every such call runs inside exactly one transaction and
//! commits only when every step reports success. A step that affects zero
//! rows or fails aborts the call and nothing is persisted.

use crate::bind;
use crate::catalog::Table;
use crate::changeset::ChangeSet;
use crate::criteria::{self, Criterion};
use crate::db::{self, Database};
use crate::error::{StoreError, StoreResult};
use crate::model::{self, NewComment, NewData, NewParent, NewStudent};
use chrono::NaiveDate;
use rusqlite::params;
use std::sync::Arc;

/// Partial update for a parent row; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ParentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial update for a student row.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub class_name: Option<String>,
}

/// Partial update for an academic data row.
#[derive(Debug, Clone, Default)]
pub struct DataUpdate {
    pub maths: Option<i64>,
    pub english: Option<i64>,
    pub science: Option<i64>,
}

/// Partial update for a comment row.
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub note: Option<String>,
    pub date_added: Option<NaiveDate>,
}

/// Create/update/delete operations spanning the person and academic tables.
pub struct RecordStore {
    db: Arc<Database>,
}

impl RecordStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Convert a storage fault into a `false` return, keeping precondition
    /// errors (validation, configuration) as raised errors.
    fn contain(operation: &'static str, result: StoreResult<()>) -> StoreResult<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(error) if error.is_precondition() => Err(error),
            Err(error) => {
                tracing::error!(operation, %error, "record mutation failed");
                Ok(false)
            }
        }
    }

    /// Insert a parent row plus one relationship row per linked student,
    /// all in one transaction.
    pub async fn add_parent(&self, parent: &NewParent) -> StoreResult<bool> {
        let result = self
            .db
            .with_transaction(|tx| {
                db::execute_step(
                    tx,
                    "INSERT INTO Parents (FirstName, LastName) VALUES (?1, ?2)",
                    params![parent.first_name, parent.last_name],
                )?;
                let parent_id = tx.last_insert_rowid();
                for link in &parent.children {
                    db::execute_step(
                        tx,
                        "INSERT INTO ParentStudents (ParentId, StudentId, Relationship) \
                         VALUES (?1, ?2, ?3)",
                        params![parent_id, link.student_id, link.relationship],
                    )?;
                }
                Ok(())
            })
            .await;
        Self::contain("add_parent", result)
    }

    /// Insert a student row plus one relationship row per linked parent,
    /// all in one transaction.
    pub async fn add_student(&self, student: &NewStudent) -> StoreResult<bool> {
        let result = self
            .db
            .with_transaction(|tx| {
                db::execute_step(
                    tx,
                    "INSERT INTO Students (FirstName, LastName, DateOfBirth, Class) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        student.first_name,
                        student.last_name,
                        model::encode_birth_date(student.date_of_birth),
                        student.class_name
                    ],
                )?;
                let student_id = tx.last_insert_rowid();
                for link in &student.guardians {
                    db::execute_step(
                        tx,
                        "INSERT INTO ParentStudents (ParentId, StudentId, Relationship) \
                         VALUES (?1, ?2, ?3)",
                        params![link.parent_id, student_id, link.relationship],
                    )?;
                }
                Ok(())
            })
            .await;
        Self::contain("add_student", result)
    }

    /// Insert an academic data row and return its id.
    ///
    /// Unlike the other write paths, statement faults here are logged and
    /// re-thrown rather than converted to a return value.
    pub async fn add_data(&self, data: &NewData) -> StoreResult<i64> {
        let result = self
            .db
            .with_transaction(|tx| {
                db::execute_step(
                    tx,
                    "INSERT INTO Data (StudentId, Maths, English, Science) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![data.student_id, data.maths, data.english, data.science],
                )?;
                Ok(tx.last_insert_rowid())
            })
            .await;
        result.inspect_err(|error| {
            tracing::error!(student_id = data.student_id, %error, "data insert failed");
        })
    }

    /// Insert a comment row and return its id.
    ///
    /// Faults are logged and re-thrown, matching [`RecordStore::add_data`].
    pub async fn add_comment(&self, comment: &NewComment) -> StoreResult<i64> {
        let result = self
            .db
            .with_transaction(|tx| {
                db::execute_step(
                    tx,
                    "INSERT INTO Comments (StudentId, Note, DateAdded) VALUES (?1, ?2, ?3)",
                    params![
                        comment.student_id,
                        comment.note,
                        model::encode_birth_date(comment.date_added)
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            })
            .await;
        result.inspect_err(|error| {
            tracing::error!(student_id = comment.student_id, %error, "comment insert failed");
        })
    }

    /// Apply present fields of `update` to the parent keyed by `id`.
    pub async fn update_parent(&self, id: i64, update: &ParentUpdate) -> StoreResult<bool> {
        let changes = ChangeSet::new(Table::Parents)
            .set_opt("FirstName", update.first_name.clone())
            .set_opt("LastName", update.last_name.clone());
        self.apply_update("update_parent", id, changes).await
    }

    /// Apply present fields of `update` to the student keyed by `id`.
    pub async fn update_student(&self, id: i64, update: &StudentUpdate) -> StoreResult<bool> {
        let changes = ChangeSet::new(Table::Students)
            .set_opt("FirstName", update.first_name.clone())
            .set_opt("LastName", update.last_name.clone())
            .set_opt("DateOfBirth", update.date_of_birth.map(model::encode_birth_date))
            .set_opt("Class", update.class_name.clone());
        self.apply_update("update_student", id, changes).await
    }

    /// Apply present fields of `update` to the data row keyed by `id`.
    pub async fn update_data(&self, id: i64, update: &DataUpdate) -> StoreResult<bool> {
        let changes = ChangeSet::new(Table::Data)
            .set_opt("Maths", update.maths)
            .set_opt("English", update.english)
            .set_opt("Science", update.science);
        self.apply_update("update_data", id, changes).await
    }

    /// Apply present fields of `update` to the comment keyed by `id`.
    pub async fn update_comment(&self, id: i64, update: &CommentUpdate) -> StoreResult<bool> {
        let changes = ChangeSet::new(Table::Comments)
            .set_opt("Note", update.note.clone())
            .set_opt("DateAdded", update.date_added.map(model::encode_birth_date));
        self.apply_update("update_comment", id, changes).await
    }

    async fn apply_update(
        &self,
        operation: &'static str,
        id: i64,
        changes: ChangeSet,
    ) -> StoreResult<bool> {
        if id <= 0 {
            return Err(StoreError::validation("valid record id required"));
        }
        if changes.is_empty() {
            return Ok(true);
        }
        let result = self.db.with_transaction(|tx| changes.apply(tx, id)).await;
        Self::contain(operation, result)
    }

    /// Delete the record keyed by `id` from an allow-listed table.
    ///
    /// `ParentStudents` is keyed by `ParentId` (composite primary key), so a
    /// single call may remove several relationship rows; success means at
    /// least one row was removed.
    pub async fn delete_record(&self, table: &str, id: i64) -> StoreResult<bool> {
        let table = Table::resolve(table)?;
        if id <= 0 {
            return Err(StoreError::validation("valid record id required"));
        }
        let sql = format!("DELETE FROM {} WHERE {} = ?1", table, table.key_column());
        match self.db.execute(&sql, &bind![id]).await {
            Ok(affected) => Ok(affected > 0),
            Err(error) => {
                tracing::error!(table = %table, id, %error, "record delete failed");
                Ok(false)
            }
        }
    }

    /// Delete every row of an allow-listed table matching the criteria.
    ///
    /// The criteria collection must be non-empty; the WHERE clause comes
    /// from the criteria builder, so unknown fields are dropped and values
    /// are always bound. Succeeds when the statement executes, whether or
    /// not any rows matched.
    pub async fn delete_records_by_criteria(
        &self,
        table: &str,
        criteria: &[Criterion],
    ) -> StoreResult<bool> {
        let clause = criteria::build_where_clause(table, criteria)?;
        let table = Table::resolve(table)?;
        let sql = format!("DELETE FROM {} {}", table, clause.sql());
        match self.db.execute(&sql, clause.params()).await {
            Ok(affected) => {
                tracing::info!(table = %table, removed = affected, "criteria delete executed");
                Ok(true)
            }
            Err(error) => {
                tracing::error!(table = %table, %error, "criteria delete failed");
                Ok(false)
            }
        }
    }

    /// Delete every row of one allow-listed table.
    pub async fn clear_table(&self, table: &str) -> StoreResult<bool> {
        let table = Table::resolve(table)?;
        match self.db.execute(&format!("DELETE FROM {table}"), &bind![]).await {
            Ok(affected) => {
                tracing::info!(table = %table, removed = affected, "table cleared");
                Ok(true)
            }
            Err(error) => {
                tracing::error!(table = %table, %error, "clearing table failed");
                Ok(false)
            }
        }
    }

    /// Delete every row of every allow-listed table inside one transaction,
    /// children before parents.
    pub async fn clear_all_tables(&self) -> StoreResult<bool> {
        let result = self
            .db
            .with_transaction(|tx| {
                for table in Table::ALL {
                    tx.execute(&format!("DELETE FROM {table}"), params![])?;
                }
                Ok(())
            })
            .await;
        Self::contain("clear_all_tables", result)
    }
}
