//! Static schema catalog: the allow-list of table and column names.
//!
//! Every dynamically composed identifier must come from this catalog before
//! it is spliced into SQL text. Table identities are an explicit enum, so
//! dynamic-table dispatch is a match on [`Table`] rather than anything
//! runtime-typed.

use crate::error::{StoreError, StoreResult};

/// The fixed set of tables the store may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Students,
    Parents,
    ParentStudents,
    Bookings,
    Data,
    Comments,
}

impl Table {
    /// All tables, parents last so child rows can be cleared first.
    pub const ALL: [Table; 6] = [
        Table::Bookings,
        Table::Data,
        Table::Comments,
        Table::ParentStudents,
        Table::Students,
        Table::Parents,
    ];

    /// Resolve a caller-supplied table name against the catalog.
    pub fn parse(name: &str) -> Option<Table> {
        match name {
            "Students" => Some(Table::Students),
            "Parents" => Some(Table::Parents),
            "ParentStudents" => Some(Table::ParentStudents),
            "Bookings" => Some(Table::Bookings),
            "Data" => Some(Table::Data),
            "Comments" => Some(Table::Comments),
            _ => None,
        }
    }

    /// Like [`Table::parse`], but raises a configuration error for names
    /// outside the catalog.
    pub fn resolve(name: &str) -> StoreResult<Table> {
        Table::parse(name)
            .ok_or_else(|| StoreError::configuration(format!("unknown table '{name}'")))
    }

    /// The table name as it appears in SQL text.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Students => "Students",
            Table::Parents => "Parents",
            Table::ParentStudents => "ParentStudents",
            Table::Bookings => "Bookings",
            Table::Data => "Data",
            Table::Comments => "Comments",
        }
    }

    /// Valid column names for this table.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Students => &["Id", "FirstName", "LastName", "DateOfBirth", "Class"],
            Table::Parents => &["Id", "FirstName", "LastName"],
            Table::ParentStudents => &["ParentId", "StudentId", "Relationship"],
            Table::Bookings => &["Id", "StudentId", "BookingDate", "TimeSlot"],
            Table::Data => &["Id", "StudentId", "Maths", "English", "Science"],
            Table::Comments => &["Id", "StudentId", "Note", "DateAdded"],
        }
    }

    /// The column deletes are keyed on. `ParentStudents` has a composite
    /// primary key, so it is keyed by `ParentId` instead of a surrogate id.
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::ParentStudents => "ParentId",
            _ => "Id",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `name` is a table in the catalog.
pub fn is_valid_table(name: &str) -> bool {
    Table::parse(name).is_some()
}

/// Whether `field` is a column of `table`.
pub fn is_valid_field(table: Table, field: &str) -> bool {
    table.columns().contains(&field)
}
