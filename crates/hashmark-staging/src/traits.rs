//! StagingArea trait: the capability the ingest pipeline consumes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StagingError};

/// One object waiting in the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObject {
    /// Name as reported by the trigger, possibly with a container prefix.
    pub name: String,
    /// Size in bytes as reported by the trigger.
    pub length: u64,
}

impl StagedObject {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    /// The key addressing this object inside the staging area.
    pub fn key(&self) -> &str {
        object_key(&self.name)
    }
}

/// Strip any container prefix from a trigger-reported name.
///
/// `uploads/report.pdf` and `report.pdf` both address `report.pdf`.
pub fn object_key(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Reject keys that are empty or could address anything outside the area.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');
    if bad {
        return Err(StagingError::InvalidName(key.to_string()));
    }
    Ok(())
}

/// The staging area: transient storage for uploads awaiting ingest.
///
/// Methods take object keys (see [`object_key`]); callers holding a
/// trigger-reported name should go through [`StagedObject::key`].
#[async_trait]
pub trait StagingArea: Send + Sync {
    /// Stage bytes under a key, replacing any previous object.
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Describe a staged object.
    async fn stat(&self, key: &str) -> Result<StagedObject>;

    /// Read a staged object fully into memory.
    async fn read(&self, key: &str) -> Result<Bytes>;

    /// Delete a staged object.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List everything currently staged, ordered by key.
    async fn list(&self) -> Result<Vec<StagedObject>>;
}
