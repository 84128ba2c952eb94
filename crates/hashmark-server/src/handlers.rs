//! Request handlers.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use hashmark::core::PrimaryHash;
use hashmark::store::StoreError;
use hashmark::{ClientInputError, Verification, VerificationMode, VerificationResult};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Successful `POST /verify` body.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub verification: VerificationResult,
    pub request_info: RequestInfo,
}

/// Echo of what was asked, and when.
#[derive(Debug, Serialize)]
pub struct RequestInfo {
    pub provided_hash: PrimaryHash,
    pub verification_timestamp: DateTime<Utc>,
    pub mode: VerificationMode,
}

impl From<Verification> for VerifyResponse {
    fn from(verification: Verification) -> Self {
        Self {
            success: true,
            verification: verification.result,
            request_info: RequestInfo {
                provided_hash: verification.provided_hash,
                verification_timestamp: Utc::now(),
                mode: verification.mode,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: u64,
}

/// The media type of a Content-Type header, lowercased, without parameters.
fn media_type(req: &Request) -> Option<String> {
    let value = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default().trim();
    Some(essence.to_ascii_lowercase())
}

/// POST /verify - Check whether a file, or its SHA-256, is in the ledger.
///
/// `multipart/form-data` bodies are hashed from their first file part;
/// `application/json` bodies must carry `{"hash": "<64 hex chars>"}`.
#[tracing::instrument(skip(state, req), fields(mode))]
pub async fn verify(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<VerifyResponse>> {
    let verification = match media_type(&req).as_deref() {
        Some("multipart/form-data") => {
            tracing::Span::current().record("mode", "file");
            let data = read_file_part(req, &state).await?;
            state.verification.verify_bytes(&data).await?
        }
        Some("application/json") => {
            tracing::Span::current().record("mode", "hash");
            let hash = read_hash_field(req, state.max_upload_bytes).await?;
            state.verification.verify_hash_str(&hash).await?
        }
        other => {
            return Err(ClientInputError::UnsupportedContentType(other.map(str::to_owned)).into());
        }
    };

    Ok(Json(verification.into()))
}

/// Bytes of the first multipart part that carries a filename.
async fn read_file_part(req: Request, state: &AppState) -> ApiResult<bytes::Bytes> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| ClientInputError::MalformedBody(e.body_text()))?;

    loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;
        let Some(field) = field else {
            return Err(ClientInputError::MissingFilePart.into());
        };
        if let Some(file_name) = field.file_name() {
            tracing::debug!(file_name, "verifying uploaded file");
            return field.bytes().await.map_err(multipart_error);
        }
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ClientInputError::MalformedBody(e.body_text()).into()
    }
}

/// The `hash` field of a JSON body.
///
/// A body without the field is a missing-field error; a field that is not a
/// string is a malformed hash of length zero.
async fn read_hash_field(req: Request, limit: usize) -> ApiResult<String> {
    let body = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ClientInputError::MalformedBody(format!("failed to read body: {}", e)))?;
    let json: Value = serde_json::from_slice(&body)
        .map_err(|e| ClientInputError::MalformedBody(format!("invalid JSON: {}", e)))?;

    match json.get("hash") {
        None => Err(ClientInputError::MissingHashField.into()),
        Some(Value::String(hash)) => Ok(hash.clone()),
        Some(_) => Err(ClientInputError::MalformedHash { received_length: 0 }.into()),
    }
}

/// GET /health - Liveness plus a ledger round trip.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let records = tokio::time::timeout(state.store_timeout, state.ledger.count())
        .await
        .map_err(|_| {
            let ms = u64::try_from(state.store_timeout.as_millis()).unwrap_or(u64::MAX);
            StoreError::Timeout(ms)
        })??;

    Ok(Json(HealthResponse {
        status: "ok",
        records,
    }))
}
