//! HTTP surface for Hashmark.
//!
//! - `POST /verify` - verify a file (multipart) or a SHA-256 (JSON)
//! - `GET /health` - liveness and record count
//!
//! Ingest is not exposed over HTTP; uploads reach the staging area out of band
//! and are picked up by the `hashmark ingest` / `hashmark sweep` commands.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
