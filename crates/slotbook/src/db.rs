//! The shared database connection handle.
//!
//! The store layers borrow one already-open connection owned by the
//! composition root. A single SQLite connection cannot safely execute two
//! concurrent statements, so the handle serializes access with an async
//! mutex; statements run to completion inside the lock and the guard is
//! never held across an await point.

use crate::error::{StoreError, StoreResult};
use crate::param::ParamList;
use crate::row::FromRow;
use rusqlite::{Connection, ToSql, Transaction};
use std::path::Path;
use tokio::sync::Mutex;

/// Build a [`ParamList`] from a list of bindable values.
///
/// ```ignore
/// let params = slotbook::bind![student_id, encode_date(date)];
/// ```
#[macro_export]
macro_rules! bind {
    ($($value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut list = $crate::param::ParamList::new();
        $(list.push($value);)*
        list
    }};
}

/// An open database handle shared by the booking and record stores.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Adopt an already-open connection.
    ///
    /// The store never opens or closes connections on its own; handing in a
    /// closed or misconfigured connection is a construction-time mistake,
    /// not a per-call failure.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open a database file and enable foreign-key enforcement.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self::new(conn))
    }

    /// Open a fresh in-memory database with foreign keys enabled.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self::new(conn))
    }

    /// Execute a single statement and return the affected row count.
    pub async fn execute(&self, sql: &str, params: &ParamList) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        let refs = params.as_refs();
        let affected = conn.execute(sql, &refs[..])?;
        Ok(affected)
    }

    /// Execute a batch of semicolon-separated statements (DDL).
    pub async fn batch(&self, sql: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and map every row through [`FromRow`].
    pub async fn query_as<T: FromRow>(
        &self,
        sql: &str,
        params: &ParamList,
    ) -> StoreResult<Vec<T>> {
        let conn = self.conn.lock().await;
        let refs = params.as_refs();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(&refs[..])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(T::from_row(row)?);
        }
        Ok(out)
    }

    /// Run a query and map the first row, if any.
    pub async fn query_opt_as<T: FromRow>(
        &self,
        sql: &str,
        params: &ParamList,
    ) -> StoreResult<Option<T>> {
        let conn = self.conn.lock().await;
        let refs = params.as_refs();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(&refs[..])?;
        match rows.next()? {
            Some(row) => Ok(Some(T::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Run a single-column, single-row query (counts and the like).
    pub async fn query_scalar<T: rusqlite::types::FromSql>(
        &self,
        sql: &str,
        params: &ParamList,
    ) -> StoreResult<T> {
        let conn = self.conn.lock().await;
        let refs = params.as_refs();
        let mut stmt = conn.prepare(sql)?;
        let value = stmt.query_row(&refs[..], |row| row.get::<_, T>(0))?;
        Ok(value)
    }

    /// Run `body` inside one transaction scoped to this call.
    ///
    /// Commits only when `body` returns `Ok`; on any error the transaction
    /// is dropped and SQLite rolls it back, so nothing partial commits.
    /// Transactions are never shared or nested across calls.
    pub async fn with_transaction<T>(
        &self,
        body: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let value = body(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Execute inside a transaction and require a nonzero affected count.
///
/// Multi-step mutations abort (and roll back) when any step touches no rows.
pub(crate) fn execute_step(
    tx: &Transaction<'_>,
    sql: &str,
    params: &[&dyn ToSql],
) -> StoreResult<usize> {
    let affected = tx.execute(sql, params)?;
    if affected == 0 {
        return Err(StoreError::Other(format!(
            "statement affected no rows: {sql}"
        )));
    }
    Ok(affected)
}
