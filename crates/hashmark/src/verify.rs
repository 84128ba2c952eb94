//! The verification service: does the ledger know this content?
//!
//! File bytes and bare hash strings both reduce to a [`PrimaryHash`] before
//! the ledger is consulted. A hit bumps the record's verification counter on
//! a best-effort basis: failing to persist it never fails the request.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hashmark_core::{fingerprint, FingerprintRecord, PrimaryHash, RecordStatus};
use hashmark_store::{Ledger, LedgerExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::HashmarkConfig;
use crate::error::Result;
use crate::ops::{best_effort, with_deadline};

pub const FOUND_MESSAGE: &str = "File verified successfully! This file existed in our system.";
pub const NOT_FOUND_MESSAGE: &str = "This file hash was not found in our records.";

/// How the caller identified the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// The caller uploaded the file itself.
    File,
    /// The caller supplied a SHA-256 hex string.
    Hash,
}

/// Descriptive fields of a matched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetails {
    pub original_filename: String,
    pub file_size: u64,
    pub upload_timestamp: DateTime<Utc>,
    pub sha256_hash: PrimaryHash,
    pub verification_count: u64,
    pub last_verified: Option<DateTime<Utc>>,
}

/// Where the proof lives in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDetails {
    pub partition_key: String,
    pub row_key: String,
    pub storage_status: RecordStatus,
}

/// The existence proof returned to callers.
///
/// A hit carries `file_details` and `proof_details`; a miss carries
/// `searched_hash` and `search_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub exists: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_details: Option<FileDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_details: Option<ProofDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searched_hash: Option<PrimaryHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_timestamp: Option<DateTime<Utc>>,
}

impl VerificationResult {
    pub fn found(record: &FingerprintRecord) -> Self {
        Self {
            exists: true,
            message: FOUND_MESSAGE.to_string(),
            file_details: Some(FileDetails {
                original_filename: record.original_filename.clone(),
                file_size: record.file_size_bytes,
                upload_timestamp: record.ingest_timestamp,
                sha256_hash: record.primary_hash,
                verification_count: record.verification_count,
                last_verified: record.last_verified,
            }),
            proof_details: Some(ProofDetails {
                partition_key: record.partition_key.clone(),
                row_key: record.row_key.clone(),
                storage_status: record.status,
            }),
            searched_hash: None,
            search_timestamp: None,
        }
    }

    pub fn not_found(hash: PrimaryHash, searched_at: DateTime<Utc>) -> Self {
        Self {
            exists: false,
            message: NOT_FOUND_MESSAGE.to_string(),
            file_details: None,
            proof_details: None,
            searched_hash: Some(hash),
            search_timestamp: Some(searched_at),
        }
    }
}

/// A verification together with what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub provided_hash: PrimaryHash,
    pub mode: VerificationMode,
    pub result: VerificationResult,
}

/// Answers existence queries against the ledger.
pub struct VerificationService<L: Ledger + ?Sized> {
    ledger: Arc<L>,
    store_timeout: Duration,
}

impl<L: Ledger + ?Sized> Clone for VerificationService<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            store_timeout: self.store_timeout,
        }
    }
}

impl<L: Ledger + ?Sized> VerificationService<L> {
    pub fn new(ledger: Arc<L>, config: &HashmarkConfig) -> Self {
        Self {
            ledger,
            store_timeout: config.store_timeout(),
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Verify uploaded content. The bytes are only hashed, never kept.
    pub async fn verify_bytes(&self, data: &[u8]) -> Result<Verification> {
        let provided_hash = fingerprint(data).primary;
        let result = self.verify(&provided_hash).await?;
        Ok(Verification {
            provided_hash,
            mode: VerificationMode::File,
            result,
        })
    }

    /// Verify a caller-supplied SHA-256 hex string.
    ///
    /// Malformed strings are rejected as client input before the ledger is
    /// touched. Uppercase hex is accepted and normalized.
    pub async fn verify_hash_str(&self, hash: &str) -> Result<Verification> {
        let provided_hash = PrimaryHash::parse(hash)?;
        let result = self.verify(&provided_hash).await?;
        Ok(Verification {
            provided_hash,
            mode: VerificationMode::Hash,
            result,
        })
    }

    /// Look up a fingerprint and count the verification on a hit.
    #[instrument(skip(self, hash), fields(hash = %hash))]
    pub async fn verify(&self, hash: &PrimaryHash) -> Result<VerificationResult> {
        let now = Utc::now();

        let record = with_deadline(self.store_timeout, self.ledger.find_by_primary_hash(hash))
            .await
            .map_err(|e| {
                error!(error = %e, "ledger lookup failed");
                e
            })?;

        let Some(record) = record else {
            info!("verification miss");
            return Ok(VerificationResult::not_found(*hash, now));
        };

        let persisted = best_effort(
            "increment verification count",
            with_deadline(
                self.store_timeout,
                self.ledger.increment_verification(&record, now),
            )
            .await,
        );
        let record = persisted.unwrap_or_else(|| record.with_verification(now));

        info!(
            key = %record.key(),
            verification_count = record.verification_count,
            "verification hit"
        );
        Ok(VerificationResult::found(&record))
    }
}
