//! The assembled system: one ledger and one staging area shared by both services.

use std::sync::Arc;

use hashmark_staging::{FsStaging, StagingArea};
use hashmark_store::{Ledger, SqliteLedger};

use crate::config::HashmarkConfig;
use crate::error::Result;
use crate::ingest::IngestPipeline;
use crate::verify::VerificationService;

/// Ingest pipeline and verification service wired to the same backends.
pub struct Hashmark<L: Ledger + ?Sized, S: StagingArea + ?Sized> {
    config: HashmarkConfig,
    ingest: IngestPipeline<L, S>,
    verification: VerificationService<L>,
}

impl<L: Ledger + ?Sized, S: StagingArea + ?Sized> Hashmark<L, S> {
    pub fn new(ledger: Arc<L>, staging: Arc<S>, config: HashmarkConfig) -> Self {
        let ingest = IngestPipeline::new(Arc::clone(&ledger), staging, &config);
        let verification = VerificationService::new(ledger, &config);
        Self {
            config,
            ingest,
            verification,
        }
    }

    pub fn config(&self) -> &HashmarkConfig {
        &self.config
    }

    pub fn ingest(&self) -> &IngestPipeline<L, S> {
        &self.ingest
    }

    pub fn verification(&self) -> &VerificationService<L> {
        &self.verification
    }

    pub fn ledger(&self) -> &Arc<L> {
        self.ingest.ledger()
    }

    pub fn staging(&self) -> &Arc<S> {
        self.ingest.staging()
    }
}

impl Hashmark<SqliteLedger, FsStaging> {
    /// Open the SQLite ledger and staging directory named by `config`.
    pub async fn open(config: HashmarkConfig) -> Result<Self> {
        config.validate()?;
        let ledger = SqliteLedger::open(&config.database_path, &config.table_name)?;
        let staging = FsStaging::open(&config.staging_dir).await?;
        tracing::info!(
            database = %config.database_path.display(),
            table = %config.table_name,
            staging = %config.staging_dir.display(),
            "hashmark opened"
        );
        Ok(Self::new(Arc::new(ledger), Arc::new(staging), config))
    }
}
