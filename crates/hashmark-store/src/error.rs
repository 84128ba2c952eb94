//! Error types for the store module.

use hashmark_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record already occupies this ledger key.
    #[error("conflict: a record already exists at {partition_key}/{row_key}")]
    Conflict {
        partition_key: String,
        row_key: String,
    },

    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record failed structural or replacement validation.
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Table name is not a valid identifier.
    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The ledger did not answer within the caller's deadline.
    #[error("ledger call timed out after {0} ms")]
    Timeout(u64),

    /// The ledger cannot serve requests (poisoned lock, failed worker, injected fault).
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
