//! Error types for slotbook

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for booking and record operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing input caught before any write is attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// A booking that would violate the one-booking-per-student or
    /// one-booking-per-slot invariant
    #[error("Booking conflict: {0}")]
    Conflict(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unrecognized table or column name passed to a generic operation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Statement execution error
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a booking conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a booking conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether the error was raised by input checks (and therefore before
    /// any statement touched the connection).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::NotFound(_) | Self::Configuration(_)
        )
    }
}
