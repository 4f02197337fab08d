//! Sparse partial-field updates.
//!
//! An update request carries many optional fields; each present field
//! updates one column and absent fields are skipped. The entries are
//! applied column-by-column inside the caller's transaction, so a record
//! update either lands completely or not at all.

use crate::catalog::{self, Table};
use crate::db;
use crate::error::{StoreError, StoreResult};
use crate::param::Param;
use rusqlite::{ToSql, Transaction};

/// An ordered map of column name → new value for one record.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    table: Table,
    entries: Vec<(String, Param)>,
}

impl ChangeSet {
    /// Start a changeset for one table.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            entries: Vec::new(),
        }
    }

    /// Queue a column update.
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.entries.push((column.to_string(), Param::new(value)));
        self
    }

    /// Queue a column update when the value is present; skip otherwise.
    pub fn set_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// The table this changeset targets.
    pub fn table(&self) -> Table {
        self.table
    }

    /// Whether any column updates are queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queued column updates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply every queued update to the record keyed by `id`, one UPDATE
    /// statement per column, inside the caller's transaction.
    ///
    /// Column names must be in the schema catalog; an unknown column fails
    /// the whole call before any statement runs. A statement touching no
    /// rows (unknown id) aborts the transaction.
    pub(crate) fn apply(&self, tx: &Transaction<'_>, id: i64) -> StoreResult<()> {
        for (column, _) in &self.entries {
            if !catalog::is_valid_field(self.table, column) {
                return Err(StoreError::configuration(format!(
                    "unknown column '{}' for table '{}'",
                    column, self.table
                )));
            }
        }
        for (column, value) in &self.entries {
            let sql = format!(
                "UPDATE {} SET {} = ?1 WHERE {} = ?2",
                self.table,
                column,
                self.table.key_column()
            );
            let params: [&dyn ToSql; 2] = [value.as_sql(), &id];
            db::execute_step(tx, &sql, &params)?;
        }
        Ok(())
    }
}
