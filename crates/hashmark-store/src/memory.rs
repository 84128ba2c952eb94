//! In-memory implementation of the Ledger trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use hashmark_core::{
    validate_record, validate_replacement, FingerprintRecord, PrimaryHash, RecordKey,
};

use crate::error::{Result, StoreError};
use crate::traits::Ledger;

/// In-memory ledger implementation.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
/// Records are kept ordered by `(partition_key, row_key)`, so hash lookups
/// scan in the same order the SQLite ledger sorts by.
#[derive(Default)]
pub struct MemoryLedger {
    records: RwLock<BTreeMap<RecordKey, FingerprintRecord>>,
}

impl MemoryLedger {
    /// Create a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<RecordKey, FingerprintRecord>>> {
        self.records
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<RecordKey, FingerprintRecord>>> {
        self.records
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn find_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> Result<Option<FingerprintRecord>> {
        let records = self.read()?;
        Ok(records
            .values()
            .find(|r| &r.primary_hash == hash)
            .cloned())
    }

    async fn find_all_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> Result<Vec<FingerprintRecord>> {
        let records = self.read()?;
        Ok(records
            .values()
            .filter(|r| &r.primary_hash == hash)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<FingerprintRecord>> {
        let key = RecordKey {
            partition_key: partition_key.to_string(),
            row_key: row_key.to_string(),
        };
        Ok(self.read()?.get(&key).cloned())
    }

    async fn list_partition(&self, partition_key: &str) -> Result<Vec<FingerprintRecord>> {
        let records = self.read()?;
        Ok(records
            .iter()
            .filter(|(key, _)| key.partition_key == partition_key)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.read()?.len() as u64)
    }

    async fn insert(&self, record: &FingerprintRecord) -> Result<()> {
        validate_record(record)?;
        let mut records = self.write()?;

        let key = record.key();
        if records.contains_key(&key) {
            return Err(StoreError::Conflict {
                partition_key: key.partition_key,
                row_key: key.row_key,
            });
        }

        records.insert(key, record.clone());
        Ok(())
    }

    async fn replace(&self, record: &FingerprintRecord) -> Result<()> {
        let mut records = self.write()?;

        let key = record.key();
        let existing = records
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        validate_replacement(existing, record)?;
        *existing = record.clone();
        Ok(())
    }
}
