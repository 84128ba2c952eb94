//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hashmark::store::StoreError;
use hashmark::{ClientInputError, HashmarkError};
use serde::Serialize;

/// Content types `POST /verify` understands.
pub const SUPPORTED_TYPES: [&str; 2] = ["multipart/form-data", "application/json"];

/// Message returned for every 500. Internal detail goes to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error occurred during verification";

/// Shape of a JSON hash request, shown to callers who forget the field.
#[derive(Debug, Serialize)]
pub struct HashExample {
    pub hash: &'static str,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_types: Option<[&'static str; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<HashExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_length: Option<usize>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientInputError),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Client(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_body(&self) -> ErrorResponse {
        let mut body = ErrorResponse {
            success: false,
            error: self.to_string(),
            supported_types: None,
            example: None,
            received_length: None,
        };
        match self {
            Self::Client(ClientInputError::UnsupportedContentType(_)) => {
                body.supported_types = Some(SUPPORTED_TYPES);
            }
            Self::Client(ClientInputError::MissingHashField) => {
                body.example = Some(HashExample { hash: "abc123..." });
            }
            Self::Client(ClientInputError::MalformedHash { received_length }) => {
                body.received_length = Some(*received_length);
            }
            Self::Internal(_) => {
                body.error = INTERNAL_ERROR_MESSAGE.to_string();
            }
            _ => {}
        }
        body
    }
}

impl From<HashmarkError> for ApiError {
    fn from(e: HashmarkError) -> Self {
        match e {
            HashmarkError::ClientInput(e) => Self::Client(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(format!("ledger unavailable: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
