use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{AppError, Result};
use crate::store::ObjectStore;

/// Object store backed by a local media directory: one file per key.
///
/// Deleting a key that is already gone succeeds (idempotent delete); only a
/// real I/O failure is surfaced, which then aborts the metadata mutation
/// that asked for the delete.
pub struct FsObjectStore {
    media_dir: PathBuf,
}

impl FsObjectStore {
    pub fn new(media_dir: PathBuf) -> Self {
        Self { media_dir }
    }

    /// Ensure the media directory exists.
    pub async fn ensure_media_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.media_dir).await.map_err(|e| {
            AppError::Dependency(format!("failed to create media directory: {e}"))
        })?;
        Ok(())
    }

    fn object_path(&self, key: &str) -> PathBuf {
        // Keys are opaque identifiers; strip any path-like structure so a
        // key can never escape the media directory.
        let filename = Path::new(key)
            .file_name()
            .map(|f| f.to_os_string())
            .unwrap_or_else(|| key.replace('/', "_").into());
        self.media_dir.join(filename)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.object_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("object {} already absent", key);
                Ok(())
            }
            Err(e) => Err(AppError::Dependency(format!(
                "failed to delete object {key}: {e}"
            ))),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn delete_object(&self, key: &str) -> Result<()> {
        self.remove(key).await
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
