//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use bytes::Bytes;
use hashmark::{Hashmark, HashmarkConfig, IngestOutcome};
use hashmark_staging::{object_key, MemoryStaging, StagedObject, StagingArea};

use crate::faults::FlakyLedger;

/// A full Hashmark wired to in-memory backends.
///
/// The ledger is a [`FlakyLedger`], so tests can inject store failures and
/// count lookups without building anything else.
pub struct TestFixture {
    pub hashmark: Hashmark<FlakyLedger, MemoryStaging>,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HashmarkConfig::default())
    }

    pub fn with_config(config: HashmarkConfig) -> Self {
        Self {
            hashmark: Hashmark::new(
                Arc::new(FlakyLedger::new()),
                Arc::new(MemoryStaging::new()),
                config,
            ),
        }
    }

    pub fn ledger(&self) -> &Arc<FlakyLedger> {
        self.hashmark.ledger()
    }

    pub fn staging(&self) -> &Arc<MemoryStaging> {
        self.hashmark.staging()
    }

    /// Stage `content` as a trigger would report it under `name`.
    pub async fn stage(&self, name: &str, content: &[u8]) -> StagedObject {
        self.staging()
            .put(object_key(name), Bytes::copy_from_slice(content))
            .await
            .expect("staging put failed");
        StagedObject::new(name, content.len() as u64)
    }

    /// Stage and ingest in one step.
    pub async fn ingest(&self, name: &str, content: &[u8]) -> IngestOutcome {
        let object = self.stage(name, content).await;
        self.hashmark
            .ingest()
            .ingest(&object)
            .await
            .expect("ingest failed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
