//! Filesystem staging: one flat directory, one file per staged object.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StagingError};
use crate::traits::{check_key, StagedObject, StagingArea};

/// A staging area backed by a local directory.
///
/// Subdirectories and other non-file entries are ignored by [`list`](StagingArea::list).
#[derive(Debug, Clone)]
pub struct FsStaging {
    root: PathBuf,
}

impl FsStaging {
    /// Use `root` as the staging directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// The staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(key))
    }
}

fn map_not_found(key: &str, e: std::io::Error) -> StagingError {
    if e.kind() == ErrorKind::NotFound {
        StagingError::NotFound(key.to_string())
    } else {
        StagingError::Io(e)
    }
}

#[async_trait]
impl StagingArea for FsStaging {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = self.path_for(key)?;
        // Write beside the target and rename, so a trigger never sees half a file
        let tmp = self.root.join(format!(".{}.partial", key));
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn stat(&self, key: &str) -> Result<StagedObject> {
        let path = self.path_for(key)?;
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| map_not_found(key, e))?;
        if !meta.is_file() {
            return Err(StagingError::NotFound(key.to_string()));
        }
        Ok(StagedObject::new(key, meta.len()))
    }

    async fn read(&self, key: &str) -> Result<Bytes> {
        let path = self.path_for(key)?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| map_not_found(key, e))?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| map_not_found(key, e))
    }

    async fn list(&self) -> Result<Vec<StagedObject>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut objects = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = ?entry.path(), "skipping staged file with non UTF-8 name");
                continue;
            };
            // In-flight writes from put()
            if name.starts_with('.') && name.ends_with(".partial") {
                continue;
            }
            objects.push(StagedObject::new(name, meta.len()));
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }
}
