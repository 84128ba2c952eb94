//! Error types for the Hashmark services.

use hashmark_core::CoreError;
use hashmark_staging::StagingError;
use hashmark_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// A request the caller got wrong. Never reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientInputError {
    /// The body is neither multipart nor JSON.
    #[error("Unsupported content type. Use multipart/form-data for files or application/json for hash strings.")]
    UnsupportedContentType(Option<String>),

    /// JSON body without a `hash` field.
    #[error("Missing 'hash' field in JSON request body")]
    MissingHashField,

    /// Hash string of the wrong length, or not a string at all.
    #[error("Invalid hash format. SHA-256 hashes should be 64 hexadecimal characters.")]
    MalformedHash { received_length: usize },

    /// Hash string of the right length with non-hex characters.
    #[error("Invalid hash format. SHA-256 hashes should be 64 hexadecimal characters.")]
    NonHexHash,

    /// Multipart body without any file part.
    #[error("No file found in multipart request")]
    MissingFilePart,

    /// Body could not be parsed as its declared content type.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl From<CoreError> for ClientInputError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidHashLength { actual, .. } => Self::MalformedHash {
                received_length: actual,
            },
            CoreError::InvalidHashEncoding(_) => Self::NonHexHash,
            other => Self::MalformedBody(other.to_string()),
        }
    }
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    StoreUnavailable,
    Staging,
    Config,
}

/// Errors that can occur during ingest or verification.
#[derive(Debug, Error)]
pub enum HashmarkError {
    /// The request was malformed.
    #[error(transparent)]
    ClientInput(#[from] ClientInputError),

    /// The ledger failed or timed out.
    #[error("ledger unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The staging area failed.
    #[error("staging error: {0}")]
    Staging(#[from] StagingError),

    /// Configuration rejected at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HashmarkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientInput(_) => ErrorKind::ClientInput,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Staging(_) => ErrorKind::Staging,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the caller, rather than the system, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::ClientInput
    }
}

impl From<CoreError> for HashmarkError {
    fn from(e: CoreError) -> Self {
        Self::ClientInput(e.into())
    }
}

/// Result type for Hashmark service operations.
pub type Result<T> = std::result::Result<T, HashmarkError>;
