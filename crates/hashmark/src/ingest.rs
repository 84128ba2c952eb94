//! The ingest pipeline: staged bytes in, at most one ledger record out.
//!
//! Each event moves through
//! `Received -> Fingerprinted -> {DuplicateDiscarded | Committed} -> StagedCopyRemoved`.
//! Store failures stop the event before the staged copy is touched, so the
//! trigger can retry it later.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hashmark_core::{fingerprint, Fingerprint, FingerprintRecord};
use hashmark_staging::{StagedObject, StagingArea, StagingError};
use hashmark_store::Ledger;
use tracing::{debug, error, info, instrument, warn};

use crate::config::HashmarkConfig;
use crate::error::Result;
use crate::ops::with_deadline;

/// Steps of a single ingest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Fingerprinted,
    DuplicateDiscarded,
    Committed,
    StagedCopyRemoved,
}

/// What the ledger did with the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A new record was written.
    Committed,
    /// The fingerprint was already recorded; nothing was written.
    DuplicateDiscarded,
}

/// Result of ingesting one staged object.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub fingerprint: Fingerprint,
    pub disposition: Disposition,
    /// The new record, or the existing one for a duplicate.
    pub record: FingerprintRecord,
    /// False when deleting the staged copy failed.
    pub staged_copy_removed: bool,
}

impl IngestOutcome {
    /// The last stage this event reached.
    pub fn final_stage(&self) -> IngestStage {
        if self.staged_copy_removed {
            return IngestStage::StagedCopyRemoved;
        }
        match self.disposition {
            Disposition::Committed => IngestStage::Committed,
            Disposition::DuplicateDiscarded => IngestStage::DuplicateDiscarded,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.disposition == Disposition::DuplicateDiscarded
    }
}

/// Tally of a [`IngestPipeline::sweep`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub committed: usize,
    pub duplicates: usize,
    /// Events that failed and were left staged for retry.
    pub failed: usize,
    /// Events that succeeded but whose staged copy could not be deleted.
    pub left_staged: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.committed + self.duplicates + self.failed
    }
}

/// Consumes staged uploads and records first sightings in the ledger.
pub struct IngestPipeline<L: Ledger + ?Sized, S: StagingArea + ?Sized> {
    ledger: Arc<L>,
    staging: Arc<S>,
    store_timeout: Duration,
}

impl<L: Ledger + ?Sized, S: StagingArea + ?Sized> Clone for IngestPipeline<L, S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            staging: Arc::clone(&self.staging),
            store_timeout: self.store_timeout,
        }
    }
}

impl<L: Ledger + ?Sized, S: StagingArea + ?Sized> IngestPipeline<L, S> {
    pub fn new(ledger: Arc<L>, staging: Arc<S>, config: &HashmarkConfig) -> Self {
        Self {
            ledger,
            staging,
            store_timeout: config.store_timeout(),
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn staging(&self) -> &Arc<S> {
        &self.staging
    }

    /// Ingest one staged object.
    ///
    /// `object.name` is recorded as the original filename; the staged copy is
    /// addressed by its last path segment. On a store failure the error is
    /// returned and the staged copy is left in place.
    #[instrument(skip(self, object), fields(name = %object.name, length = object.length))]
    pub async fn ingest(&self, object: &StagedObject) -> Result<IngestOutcome> {
        debug!(stage = ?IngestStage::Received, "ingest started");

        let data = self.staging.read(object.key()).await.map_err(|e| {
            error!(error = %e, "failed to read staged object");
            e
        })?;
        if data.len() as u64 != object.length {
            warn!(
                reported = object.length,
                actual = data.len(),
                "staged length differs from trigger report"
            );
        }

        let fingerprint = fingerprint(&data);
        let file_size = data.len() as u64;
        drop(data);
        debug!(stage = ?IngestStage::Fingerprinted, hash = %fingerprint.primary, "fingerprinted");

        let existing = with_deadline(
            self.store_timeout,
            self.ledger.find_by_primary_hash(&fingerprint.primary),
        )
        .await
        .map_err(|e| {
            error!(hash = %fingerprint.primary, error = %e, "ledger lookup failed, staged copy kept");
            e
        })?;

        let (disposition, record) = match existing {
            Some(record) => {
                info!(
                    stage = ?IngestStage::DuplicateDiscarded,
                    hash = %fingerprint.primary,
                    first_seen = %record.ingest_timestamp,
                    "duplicate discarded"
                );
                (Disposition::DuplicateDiscarded, record)
            }
            None => {
                let record =
                    FingerprintRecord::new(&fingerprint, &object.name, file_size, Utc::now());
                with_deadline(self.store_timeout, self.ledger.insert(&record))
                    .await
                    .map_err(|e| {
                        error!(hash = %fingerprint.primary, error = %e, "ledger insert failed, staged copy kept");
                        e
                    })?;
                info!(
                    stage = ?IngestStage::Committed,
                    hash = %fingerprint.primary,
                    key = %record.key(),
                    "record committed"
                );
                (Disposition::Committed, record)
            }
        };

        let staged_copy_removed = self.remove_staged(object).await;

        Ok(IngestOutcome {
            fingerprint,
            disposition,
            record,
            staged_copy_removed,
        })
    }

    /// Ingest a staged object by its trigger-reported name.
    pub async fn ingest_named(&self, name: &str) -> Result<IngestOutcome> {
        let stat = self.staging.stat(hashmark_staging::object_key(name)).await?;
        self.ingest(&StagedObject::new(name, stat.length)).await
    }

    /// Ingest everything currently staged.
    ///
    /// Individual failures are logged and counted, never propagated; only a
    /// failure to list the staging area is an error.
    pub async fn sweep(&self) -> Result<SweepReport> {
        let objects = self.staging.list().await?;
        let mut report = SweepReport::default();

        for object in &objects {
            match self.ingest(object).await {
                Ok(outcome) => {
                    match outcome.disposition {
                        Disposition::Committed => report.committed += 1,
                        Disposition::DuplicateDiscarded => report.duplicates += 1,
                    }
                    if !outcome.staged_copy_removed {
                        report.left_staged += 1;
                    }
                }
                Err(e) => {
                    warn!(name = %object.name, error = %e, "ingest failed during sweep");
                    report.failed += 1;
                }
            }
        }

        info!(
            committed = report.committed,
            duplicates = report.duplicates,
            failed = report.failed,
            left_staged = report.left_staged,
            "sweep finished"
        );
        Ok(report)
    }

    async fn remove_staged(&self, object: &StagedObject) -> bool {
        match self.staging.delete(object.key()).await {
            Ok(()) => {
                info!(stage = ?IngestStage::StagedCopyRemoved, key = object.key(), "staged copy removed");
                true
            }
            // A concurrent ingest of the same upload got there first
            Err(StagingError::NotFound(_)) => {
                debug!(key = object.key(), "staged copy already gone");
                true
            }
            Err(e) => {
                warn!(key = object.key(), error = %e, "failed to delete staged copy");
                false
            }
        }
    }
}
