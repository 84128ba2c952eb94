//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use hashmark::store::Ledger;
use hashmark::{HashmarkConfig, VerificationService};

/// State shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub verification: VerificationService<dyn Ledger>,
    pub ledger: Arc<dyn Ledger>,
    /// Largest body `POST /verify` will read.
    pub max_upload_bytes: usize,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>, config: &HashmarkConfig) -> Self {
        Self {
            verification: VerificationService::new(Arc::clone(&ledger), config),
            ledger,
            max_upload_bytes: config.max_upload_bytes,
            store_timeout: config.store_timeout(),
        }
    }
}
