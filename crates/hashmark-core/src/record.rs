//! FingerprintRecord: the unit of truth in the ledger.
//!
//! A record is created exactly once, on first sighting of a fingerprint, and
//! is never deleted. Only `verification_count` and `last_verified` change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::fingerprint::{Fingerprint, ALGORITHM_VERSION};
use crate::types::{PrimaryHash, SecondaryHash};

/// Lifecycle tag of a committed record.
///
/// Creation is atomic from the caller's perspective, so there are no
/// intermediate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Verified,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(Self::Verified),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// The ledger address of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    /// Ingest date, `YYYY-MM-DD` in UTC.
    pub partition_key: String,
    /// `{unix_seconds}_{first 8 hex chars of the primary hash}`.
    pub row_key: String,
}

impl RecordKey {
    /// Derive the key for content ingested at `at`.
    pub fn for_ingest(at: DateTime<Utc>, primary: &PrimaryHash) -> Self {
        Self {
            partition_key: partition_key_for(at),
            row_key: row_key_for(at, primary),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}

/// The date partition for an ingest time.
pub fn partition_key_for(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// The row key for an ingest time and primary hash.
///
/// Unique within a partition unless two different contents sharing a 32-bit
/// hash prefix are ingested within the same second.
pub fn row_key_for(at: DateTime<Utc>, primary: &PrimaryHash) -> String {
    format!("{}_{}", at.timestamp(), primary.short())
}

/// A committed proof that some content existed at `ingest_timestamp`.
///
/// Field names on the wire are the ledger's column names, which are part of
/// the public verification contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub partition_key: String,
    pub row_key: String,
    #[serde(rename = "sha256_hash")]
    pub primary_hash: PrimaryHash,
    #[serde(rename = "sha3_hash")]
    pub secondary_hash: SecondaryHash,
    pub original_filename: String,
    #[serde(rename = "file_size")]
    pub file_size_bytes: u64,
    #[serde(rename = "upload_timestamp")]
    pub ingest_timestamp: DateTime<Utc>,
    #[serde(rename = "hash_algorithm_version")]
    pub algorithm_version: String,
    pub verification_count: u64,
    pub last_verified: Option<DateTime<Utc>>,
    pub status: RecordStatus,
    /// The staged copy is removed once fingerprinted.
    pub auto_deleted: bool,
}

impl FingerprintRecord {
    /// Build a fresh record for content first seen at `ingested_at`.
    pub fn new(
        fingerprint: &Fingerprint,
        original_filename: impl Into<String>,
        file_size_bytes: u64,
        ingested_at: DateTime<Utc>,
    ) -> Self {
        let key = RecordKey::for_ingest(ingested_at, &fingerprint.primary);
        Self {
            partition_key: key.partition_key,
            row_key: key.row_key,
            primary_hash: fingerprint.primary,
            secondary_hash: fingerprint.secondary,
            original_filename: original_filename.into(),
            file_size_bytes,
            ingest_timestamp: ingested_at,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            verification_count: 0,
            last_verified: None,
            status: RecordStatus::Verified,
            auto_deleted: true,
        }
    }

    /// The ledger address of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            partition_key: self.partition_key.clone(),
            row_key: self.row_key.clone(),
        }
    }

    /// Count one successful verification at `at`.
    pub fn record_verification(&mut self, at: DateTime<Utc>) {
        self.verification_count = self.verification_count.saturating_add(1);
        self.last_verified = Some(at);
    }

    /// Owned variant of [`record_verification`](Self::record_verification).
    pub fn with_verification(mut self, at: DateTime<Utc>) -> Self {
        self.record_verification(at);
        self
    }
}
