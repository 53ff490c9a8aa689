// Filesystem storage for cover images.
//
// Files land directly in the upload directory, which the web layer serves
// under `/uploads`.

use crate::core::uploads::{CoverStorage, UploadError};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct DiskCoverStorage {
    root: PathBuf,
}

impl DiskCoverStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, UploadError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(UploadError::StorageError(format!(
                "Refusing to use file name {name:?}"
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl CoverStorage for DiskCoverStorage {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), UploadError> {
        let path = self.path_for(name)?;

        if tokio::fs::metadata(&self.root).await.is_err() {
            tracing::info!(dir = %self.root.display(), "Creating upload directory");
            tokio::fs::create_dir_all(&self.root)
                .await
                .map_err(|e| UploadError::StorageError(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| UploadError::StorageError(e.to_string()))
    }

    async fn remove(&self, name: &str) -> Result<(), UploadError> {
        let path = self.path_for(name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| UploadError::StorageError(e.to_string()))
    }
}
