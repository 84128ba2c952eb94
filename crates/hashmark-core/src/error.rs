//! Error types for Hashmark Core.

use thiserror::Error;

/// Core errors raised while parsing fingerprints and record fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid hash length: expected {expected} hex characters, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    #[error("invalid hash encoding: {0}")]
    InvalidHashEncoding(String),

    #[error("unknown record status: {0}")]
    UnknownStatus(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Validation errors for record structure and replacements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("partition key mismatch: expected {expected}, got {got}")]
    PartitionKeyMismatch { expected: String, got: String },

    #[error("row key mismatch: expected {expected}, got {got}")]
    RowKeyMismatch { expected: String, got: String },

    #[error("algorithm version must not be empty")]
    MissingAlgorithmVersion,

    #[error("identity field {0} cannot change after creation")]
    IdentityChanged(&'static str),

    #[error("verification count cannot decrease: {from} -> {to}")]
    CounterDecreased { from: u64, to: u64 },
}
