//! Row → struct mapping.

use crate::error::StoreResult;

/// Map a database row into a typed record.
///
/// Implementations read columns by name, so SELECT lists must alias every
/// column they expose.
pub trait FromRow: Sized {
    fn from_row(row: &rusqlite::Row<'_>) -> StoreResult<Self>;
}
