use crate::core::categories::CategoryService;
use crate::core::content::ContentService;
use crate::core::settings::SettingsService;
use crate::core::uploads::UploadService;
use crate::infra::categories::SqliteCategoryStore;
use crate::infra::content::SqliteContentStore;
use crate::infra::settings::SqliteSettingsStore;
use crate::infra::uploads::DiskCoverStorage;
use sqlx::sqlite::SqlitePool;
use std::path::Path;
use std::sync::Arc;

/// Services shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService<SqliteContentStore, DiskCoverStorage>>,
    pub categories: Arc<CategoryService<SqliteCategoryStore>>,
    pub settings: Arc<SettingsService<SqliteSettingsStore>>,
}

impl AppState {
    /// Wire the SQLite stores and the upload directory into the services.
    pub fn new(pool: SqlitePool, upload_dir: &Path) -> Self {
        let uploads = UploadService::new(DiskCoverStorage::new(upload_dir));
        let content = ContentService::new(SqliteContentStore::new(pool.clone()), uploads);

        Self {
            content: Arc::new(content),
            categories: Arc::new(CategoryService::new(SqliteCategoryStore::new(pool.clone()))),
            settings: Arc::new(SettingsService::new(SqliteSettingsStore::new(pool))),
        }
    }
}
