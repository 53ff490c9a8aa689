// Cover image uploads - validation and naming for article covers.
//
// The service decides whether an upload is acceptable and what it is called.
// Where the bytes end up is the job of a CoverStorage implementation in infra.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::path::Path;
use thiserror::Error;

/// Largest cover image we accept (5 MiB).
pub const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;

/// Public URL prefix the stored covers are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum UploadError {
    /// The client sent something we refuse to store.
    #[error("{0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// MODELS
// ============================================================================

/// A cover image as received from the submission form.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A cover that has been written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCover {
    pub name: String,
    pub public_path: String,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait CoverStorage: Send + Sync {
    /// Persist the bytes under `name`. Names are generated by the service and
    /// never contain path separators.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), UploadError>;

    /// Remove a previously saved cover.
    async fn remove(&self, name: &str) -> Result<(), UploadError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct UploadService<C: CoverStorage> {
    storage: C,
}

impl<C: CoverStorage> UploadService<C> {
    pub fn new(storage: C) -> Self {
        Self { storage }
    }

    /// Check mimetype and size without touching storage.
    pub fn validate(upload: &CoverUpload) -> Result<(), UploadError> {
        let is_image = upload
            .content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"));
        if !is_image {
            return Err(UploadError::Rejected("Only images are allowed".to_string()));
        }

        if upload.bytes.len() > MAX_COVER_BYTES {
            return Err(UploadError::Rejected(format!(
                "File too large (max {} MB)",
                MAX_COVER_BYTES / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Build a unique stored name: `<unix-millis>-<random><.ext>`.
    pub fn stored_name(original: Option<&str>) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let extension = original
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();

        format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, extension)
    }

    /// Validate and persist a cover, returning where it can be fetched from.
    pub async fn store(&self, upload: CoverUpload) -> Result<StoredCover, UploadError> {
        Self::validate(&upload)?;

        let name = Self::stored_name(upload.file_name.as_deref());
        self.storage.save(&name, &upload.bytes).await?;

        tracing::info!(cover = %name, bytes = upload.bytes.len(), "Stored cover image");

        Ok(StoredCover {
            public_path: format!("{}/{}", PUBLIC_PREFIX, name),
            name,
        })
    }

    #[cfg(test)]
    pub fn storage(&self) -> &C {
        &self.storage
    }

    /// Best-effort cleanup for a cover whose article never made it into the store.
    pub async fn discard(&self, cover: &StoredCover) {
        if let Err(e) = self.storage.remove(&cover.name).await {
            tracing::warn!(cover = %cover.name, "Failed to remove orphaned cover: {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
