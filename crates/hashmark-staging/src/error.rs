//! Error types for the staging area.

use thiserror::Error;

/// Errors that can occur while reading or deleting staged objects.
#[derive(Debug, Error)]
pub enum StagingError {
    /// No object with this key is staged.
    #[error("staged object not found: {0}")]
    NotFound(String),

    /// The key would escape the staging area or is empty.
    #[error("invalid object name: {0:?}")]
    InvalidName(String),

    /// The staging backend refused the operation.
    #[error("staging unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for staging operations.
pub type Result<T> = std::result::Result<T, StagingError>;
