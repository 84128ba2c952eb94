//! Ledger trait: the abstract interface for fingerprint record persistence.
//!
//! This trait allows the services to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashmark_core::{FingerprintRecord, PrimaryHash};

use crate::error::Result;

/// The Ledger trait: async interface for fingerprint records.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Hash lookups are filters**: there is no uniqueness constraint on the
///   primary hash, so more than one record may match after racing ingests.
/// - **Earliest wins**: single-record lookups order matches by
///   `(partition_key, row_key)` and return the first.
/// - **Keys are immutable**: `replace` addresses the row by its key and only
///   counter fields may differ from the stored record.
#[async_trait]
pub trait Ledger: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Find the record for a primary hash.
    ///
    /// If several records share the hash, the one with the lowest
    /// `(partition_key, row_key)` is returned.
    async fn find_by_primary_hash(&self, hash: &PrimaryHash)
        -> Result<Option<FingerprintRecord>>;

    /// Find every record for a primary hash, ordered by `(partition_key, row_key)`.
    async fn find_all_by_primary_hash(&self, hash: &PrimaryHash)
        -> Result<Vec<FingerprintRecord>>;

    /// Get a record by its ledger key.
    async fn get(&self, partition_key: &str, row_key: &str)
        -> Result<Option<FingerprintRecord>>;

    /// List every record ingested on one date, ordered by row key.
    async fn list_partition(&self, partition_key: &str) -> Result<Vec<FingerprintRecord>>;

    /// Total number of records.
    async fn count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a record.
    ///
    /// Fails with `Conflict` only when the exact ledger key is taken. Does not
    /// check whether the hash is already recorded.
    async fn insert(&self, record: &FingerprintRecord) -> Result<()>;

    /// Overwrite a stored record with full-replace semantics.
    ///
    /// Fails with `NotFound` if the key is absent and with `Validation` if the
    /// replacement changes identity fields or lowers the verification count.
    async fn replace(&self, record: &FingerprintRecord) -> Result<()>;
}

/// Extension trait for read-modify-write patterns.
pub trait LedgerExt: Ledger {
    /// Count a verification of `record` and persist it.
    ///
    /// Sets `verification_count += 1` and `last_verified = now`, writes the
    /// whole record back and returns it. Concurrent increments may lose
    /// updates; a stale write that would lower the counter is rejected.
    fn increment_verification(
        &self,
        record: &FingerprintRecord,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<FingerprintRecord>> + Send;
}

impl<L: Ledger + ?Sized> LedgerExt for L {
    async fn increment_verification(
        &self,
        record: &FingerprintRecord,
        now: DateTime<Utc>,
    ) -> Result<FingerprintRecord> {
        let updated = record.clone().with_verification(now);
        self.replace(&updated).await?;
        Ok(updated)
    }
}
