//! # Hashmark
//!
//! Proof of prior existence for files. Uploaded bytes are fingerprinted,
//! recorded once in a ledger and then discarded; anyone can later present the
//! file, or just its SHA-256, and learn when it was first seen.
//!
//! ## Overview
//!
//! - **Ingest**: [`IngestPipeline`] reads a staged upload, fingerprints it,
//!   commits a record on first sighting and deletes the staged copy.
//! - **Verification**: [`VerificationService`] turns bytes or a hash string
//!   into a [`VerificationResult`] and counts each successful verification.
//! - **Configuration**: [`HashmarkConfig`], loaded once from TOML.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hashmark::{Hashmark, HashmarkConfig};
//!
//! async fn example() {
//!     let hashmark = Hashmark::open(HashmarkConfig::default()).await.unwrap();
//!
//!     // Process whatever is waiting in the staging directory
//!     let report = hashmark.ingest().sweep().await.unwrap();
//!     println!("{} new records", report.committed);
//!
//!     let verification = hashmark
//!         .verification()
//!         .verify_hash_str("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
//!         .await
//!         .unwrap();
//!     println!("exists: {}", verification.result.exists);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `hashmark::core` - Fingerprints and records
//! - `hashmark::store` - The ledger trait and its backends
//! - `hashmark::staging` - The staging area trait and its backends

pub mod app;
pub mod config;
pub mod error;
pub mod ingest;
mod ops;
pub mod verify;

// Re-export component crates
pub use hashmark_core as core;
pub use hashmark_staging as staging;
pub use hashmark_store as store;

pub use app::Hashmark;
pub use config::{ConfigError, HashmarkConfig};
pub use error::{ClientInputError, ErrorKind, HashmarkError, Result};
pub use ingest::{Disposition, IngestOutcome, IngestPipeline, IngestStage, SweepReport};
pub use verify::{
    FileDetails, ProofDetails, Verification, VerificationMode, VerificationResult,
    VerificationService, FOUND_MESSAGE, NOT_FOUND_MESSAGE,
};

pub use hashmark_core::{fingerprint, Fingerprint, FingerprintRecord, PrimaryHash};
