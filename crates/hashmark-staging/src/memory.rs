//! In-memory implementation of the StagingArea trait.
//!
//! This is primarily for testing. Same semantics as the filesystem backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StagingError};
use crate::traits::{check_key, StagedObject, StagingArea};

/// In-memory staging area. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStaging {
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryStaging {
    /// Create a new empty staging area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key is currently staged.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false)
    }

    /// Number of staged objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StagingError {
    StagingError::Unavailable(format!("lock poisoned: {}", e))
}

#[async_trait]
impl StagingArea for MemoryStaging {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        check_key(key)?;
        self.objects
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn stat(&self, key: &str) -> Result<StagedObject> {
        let objects = self.objects.read().map_err(poisoned)?;
        objects
            .get(key)
            .map(|data| StagedObject::new(key, data.len() as u64))
            .ok_or_else(|| StagingError::NotFound(key.to_string()))
    }

    async fn read(&self, key: &str) -> Result<Bytes> {
        let objects = self.objects.read().map_err(poisoned)?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StagingError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StagingError::NotFound(key.to_string()))
    }

    async fn list(&self) -> Result<Vec<StagedObject>> {
        let objects = self.objects.read().map_err(poisoned)?;
        Ok(objects
            .iter()
            .map(|(key, data)| StagedObject::new(key.clone(), data.len() as u64))
            .collect())
    }
}
