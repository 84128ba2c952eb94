//! Failure injection and call counting around the real backends.
//!
//! Wrap a [`MemoryLedger`] or [`MemoryStaging`], flip a switch, and every
//! matching call fails with an `Unavailable` error until it is flipped back.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hashmark_core::{FingerprintRecord, PrimaryHash};
use hashmark_staging::{MemoryStaging, StagedObject, StagingArea, StagingError};
use hashmark_store::{Ledger, MemoryLedger, StoreError};

/// A ledger that can be told to fail, stall, and report how often it was used.
pub struct FlakyLedger<L = MemoryLedger> {
    inner: L,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    delay_ms: AtomicU64,
    lookups: AtomicUsize,
    writes: AtomicUsize,
}

impl FlakyLedger<MemoryLedger> {
    pub fn new() -> Self {
        Self::wrap(MemoryLedger::new())
    }
}

impl Default for FlakyLedger<MemoryLedger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Ledger> FlakyLedger<L> {
    pub fn wrap(inner: L) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            lookups: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// The wrapped ledger, bypassing injection and counters.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Make every read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every insert and replace fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Sleep this long before every call.
    pub fn set_delay(&self, delay: Option<Duration>) {
        let ms = delay.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Calls that looked records up by hash.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Insert and replace calls, failed ones included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn before_read(&self) -> Result<(), StoreError> {
        self.stall().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    async fn before_write(&self) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.stall().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }

    async fn stall(&self) {
        let ms = self.delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl<L: Ledger> Ledger for FlakyLedger<L> {
    async fn find_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> hashmark_store::Result<Option<FingerprintRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.find_by_primary_hash(hash).await
    }

    async fn find_all_by_primary_hash(
        &self,
        hash: &PrimaryHash,
    ) -> hashmark_store::Result<Vec<FingerprintRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.find_all_by_primary_hash(hash).await
    }

    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> hashmark_store::Result<Option<FingerprintRecord>> {
        self.before_read().await?;
        self.inner.get(partition_key, row_key).await
    }

    async fn list_partition(
        &self,
        partition_key: &str,
    ) -> hashmark_store::Result<Vec<FingerprintRecord>> {
        self.before_read().await?;
        self.inner.list_partition(partition_key).await
    }

    async fn count(&self) -> hashmark_store::Result<u64> {
        self.before_read().await?;
        self.inner.count().await
    }

    async fn insert(&self, record: &FingerprintRecord) -> hashmark_store::Result<()> {
        self.before_write().await?;
        self.inner.insert(record).await
    }

    async fn replace(&self, record: &FingerprintRecord) -> hashmark_store::Result<()> {
        self.before_write().await?;
        self.inner.replace(record).await
    }
}

/// A staging area that can be told to fail reads or deletes.
pub struct FlakyStaging<S = MemoryStaging> {
    inner: S,
    fail_reads: AtomicBool,
    fail_deletes: AtomicBool,
    deletes: AtomicUsize,
}

impl FlakyStaging<MemoryStaging> {
    pub fn new() -> Self {
        Self::wrap(MemoryStaging::new())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for FlakyStaging<MemoryStaging> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StagingArea> FlakyStaging<S> {
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Delete calls, failed ones included.
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: StagingArea> StagingArea for FlakyStaging<S> {
    async fn put(&self, key: &str, data: Bytes) -> hashmark_staging::Result<()> {
        self.inner.put(key, data).await
    }

    async fn stat(&self, key: &str) -> hashmark_staging::Result<StagedObject> {
        self.inner.stat(key).await
    }

    async fn read(&self, key: &str) -> hashmark_staging::Result<Bytes> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StagingError::Unavailable("injected read failure".to_string()));
        }
        self.inner.read(key).await
    }

    async fn delete(&self, key: &str) -> hashmark_staging::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StagingError::Unavailable("injected delete failure".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn list(&self) -> hashmark_staging::Result<Vec<StagedObject>> {
        self.inner.list().await
    }
}
