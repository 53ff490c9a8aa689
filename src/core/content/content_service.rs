// Content service - submission and moderation of articles.
//
// This service handles:
// - Validating reader submissions and storing them as pending
// - Moderation: status changes, the exclusive highlight, edits, deletes
// - Listing articles for the public feed and the admin dashboard
//
// NO HTTP or SQL here - the store and cover storage are injected.

use super::content_models::{
    ArticleStatus, ArticleSubmission, ArticleUpdate, ArticleView, NewArticle, StatusFilter,
};
use crate::core::uploads::{CoverStorage, CoverUpload, UploadError, UploadService};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0}")]
    Validation(String),

    #[error("No updates provided")]
    EmptyUpdate,

    #[error("Content {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting articles.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new pending article and return its id.
    async fn insert(&self, article: NewArticle) -> Result<i64, ContentError>;

    /// Fetch one article joined with its category name.
    async fn get(&self, id: i64) -> Result<Option<ArticleView>, ContentError>;

    /// List articles matching the filter, highlighted first, then newest first.
    async fn list(&self, filter: StatusFilter) -> Result<Vec<ArticleView>, ContentError>;

    /// Apply a partial update atomically. Returns `false` if the id does not exist,
    /// in which case nothing is changed.
    ///
    /// When `is_highlight` is `Some(true)`, every other article loses the flag
    /// within the same transaction.
    async fn update(&self, id: i64, update: ArticleUpdate) -> Result<bool, ContentError>;

    /// Delete an article. Returns `false` if the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, ContentError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ContentService<S: ContentStore, C: CoverStorage> {
    store: S,
    uploads: UploadService<C>,
}

impl<S: ContentStore, C: CoverStorage> ContentService<S, C> {
    pub fn new(store: S, uploads: UploadService<C>) -> Self {
        Self { store, uploads }
    }

    /// Validate the required submission fields.
    ///
    /// Title, category, body and author name must all be present and non-blank.
    /// An empty author email is treated as not given.
    fn validate(submission: ArticleSubmission) -> Result<NewArticle, ContentError> {
        fn required(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let (Some(title), Some(category_id), Some(content), Some(author_name)) = (
            required(submission.title),
            required(submission.category_id),
            required(submission.content),
            required(submission.author_name),
        ) else {
            return Err(ContentError::Validation(
                "Missing required fields".to_string(),
            ));
        };

        let category_id = category_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ContentError::Validation("Invalid category_id".to_string()))?;

        Ok(NewArticle {
            title,
            category_id,
            content,
            author_name,
            author_email: required(submission.author_email),
            cover_url: None,
        })
    }

    /// Store a reader submission as a pending article.
    ///
    /// The cover is only written once the text fields have passed validation,
    /// and removed again if the insert fails.
    pub async fn submit(
        &self,
        submission: ArticleSubmission,
        cover: Option<CoverUpload>,
    ) -> Result<i64, ContentError> {
        let mut article = Self::validate(submission)?;

        if let Some(upload) = &cover {
            UploadService::<C>::validate(upload)?;
        }

        let stored = match cover {
            Some(upload) => Some(self.uploads.store(upload).await?),
            None => None,
        };
        article.cover_url = stored.as_ref().map(|c| c.public_path.clone());

        match self.store.insert(article).await {
            Ok(id) => {
                tracing::info!(id, "Content submitted for review");
                Ok(id)
            }
            Err(e) => {
                if let Some(cover) = &stored {
                    self.uploads.discard(cover).await;
                }
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<ArticleView, ContentError> {
        self.store
            .get(id)
            .await?
            .ok_or(ContentError::NotFound(id))
    }

    /// List articles for a feed. See `StatusFilter::parse` for the filter rules.
    pub async fn list(&self, filter: StatusFilter) -> Result<Vec<ArticleView>, ContentError> {
        self.store.list(filter).await
    }

    /// Overwrite the moderation status. Any state may move to any other.
    pub async fn set_status(&self, id: i64, status: ArticleStatus) -> Result<(), ContentError> {
        self.update(id, ArticleUpdate::status(status)).await
    }

    /// Make `id` the single highlighted article.
    pub async fn set_highlight(&self, id: i64) -> Result<(), ContentError> {
        self.update(id, ArticleUpdate::highlight(true)).await
    }

    /// Remove the highlight from `id` without touching other articles.
    pub async fn clear_highlight(&self, id: i64) -> Result<(), ContentError> {
        self.update(id, ArticleUpdate::highlight(false)).await
    }

    /// Apply an administrator edit.
    pub async fn update(&self, id: i64, update: ArticleUpdate) -> Result<(), ContentError> {
        if update.is_empty() {
            return Err(ContentError::EmptyUpdate);
        }

        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&update.title) || blank(&update.content) {
            return Err(ContentError::Validation(
                "Title and content cannot be empty".to_string(),
            ));
        }

        let summary = format!("{:?}", update);
        if !self.store.update(id, update).await? {
            return Err(ContentError::NotFound(id));
        }

        tracing::info!(id, update = %summary, "Content updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.store.delete(id).await? {
            return Err(ContentError::NotFound(id));
        }

        tracing::info!(id, "Content deleted");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uploads::MAX_COVER_BYTES;
    use chrono::{Duration, NaiveDateTime, Utc};
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    /// In-memory store for testing
    struct MockContentStore {
        articles: DashMap<i64, ArticleView>,
        next_id: AtomicI64,
        // Serialises highlight changes the way a transaction would
        write_lock: Mutex<()>,
        fail_inserts: AtomicBool,
    }

    impl MockContentStore {
        fn new() -> Self {
            Self {
                articles: DashMap::new(),
                next_id: AtomicI64::new(1),
                write_lock: Mutex::new(()),
                fail_inserts: AtomicBool::new(false),
            }
        }

        fn highlighted(&self) -> Vec<i64> {
            self.articles
                .iter()
                .filter(|a| a.is_highlight)
                .map(|a| a.id)
                .collect()
        }
    }

    #[async_trait]
    impl ContentStore for MockContentStore {
        async fn insert(&self, article: NewArticle) -> Result<i64, ContentError> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(ContentError::StorageError("disk full".to_string()));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            // Space inserts a second apart so ordering by time is deterministic
            let created_at: NaiveDateTime = (Utc::now() + Duration::seconds(id)).naive_utc();
            self.articles.insert(
                id,
                ArticleView {
                    id,
                    title: article.title,
                    category_id: Some(article.category_id),
                    category_name: None,
                    content: article.content,
                    author_name: article.author_name,
                    author_email: article.author_email,
                    cover_url: article.cover_url,
                    status: ArticleStatus::Pending,
                    is_highlight: false,
                    created_at,
                },
            );
            Ok(id)
        }

        async fn get(&self, id: i64) -> Result<Option<ArticleView>, ContentError> {
            Ok(self.articles.get(&id).map(|a| a.clone()))
        }

        async fn list(&self, filter: StatusFilter) -> Result<Vec<ArticleView>, ContentError> {
            let mut items: Vec<ArticleView> = self
                .articles
                .iter()
                .filter(|a| filter.matches(a.status))
                .map(|a| a.clone())
                .collect();
            items.sort_by(|a, b| {
                b.is_highlight
                    .cmp(&a.is_highlight)
                    .then(b.created_at.cmp(&a.created_at))
                    .then(b.id.cmp(&a.id))
            });
            Ok(items)
        }

        async fn update(&self, id: i64, update: ArticleUpdate) -> Result<bool, ContentError> {
            let _guard = self.write_lock.lock().unwrap();
            if !self.articles.contains_key(&id) {
                return Ok(false);
            }

            if update.is_highlight == Some(true) {
                for mut article in self.articles.iter_mut() {
                    article.is_highlight = article.id == id;
                }
            }

            let mut article = self.articles.get_mut(&id).unwrap();
            if update.is_highlight == Some(false) {
                article.is_highlight = false;
            }
            if let Some(status) = update.status {
                article.status = status;
            }
            if let Some(title) = update.title {
                article.title = title;
            }
            if let Some(content) = update.content {
                article.content = content;
            }
            if let Some(category_id) = update.category_id {
                article.category_id = Some(category_id);
            }
            Ok(true)
        }

        async fn delete(&self, id: i64) -> Result<bool, ContentError> {
            Ok(self.articles.remove(&id).is_some())
        }
    }

    #[derive(Default)]
    struct MockCoverStorage {
        files: DashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl CoverStorage for MockCoverStorage {
        async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), UploadError> {
            self.files.insert(name.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn remove(&self, name: &str) -> Result<(), UploadError> {
            self.files.remove(name);
            Ok(())
        }
    }

    fn service() -> ContentService<MockContentStore, MockCoverStorage> {
        ContentService::new(
            MockContentStore::new(),
            UploadService::new(MockCoverStorage::default()),
        )
    }

    fn submission(title: &str) -> ArticleSubmission {
        ArticleSubmission {
            title: Some(title.to_string()),
            category_id: Some("1".to_string()),
            content: Some("<p>x</p>".to_string()),
            author_name: Some("Budi".to_string()),
            author_email: Some(String::new()),
        }
    }

    fn cover(content_type: &str, len: usize) -> CoverUpload {
        CoverUpload {
            file_name: Some("sampul.jpg".to_string()),
            content_type: Some(content_type.to_string()),
            bytes: vec![7u8; len],
        }
    }

    #[tokio::test]
    async fn test_submission_starts_pending() {
        let service = service();

        let id = service.submit(submission("Contoh"), None).await.unwrap();
        let article = service.get(id).await.unwrap();

        assert_eq!(article.status, ArticleStatus::Pending);
        assert!(!article.is_highlight);
        assert_eq!(article.author_email, None);
        assert_eq!(article.cover_url, None);
    }

    #[tokio::test]
    async fn test_missing_required_fields_rejected() {
        let service = service();

        let cases = [
            ArticleSubmission {
                title: None,
                ..submission("x")
            },
            ArticleSubmission {
                category_id: None,
                ..submission("x")
            },
            ArticleSubmission {
                content: Some("   ".to_string()),
                ..submission("x")
            },
            ArticleSubmission {
                author_name: None,
                ..submission("x")
            },
        ];

        for case in cases {
            let result = service.submit(case, None).await;
            assert!(matches!(result, Err(ContentError::Validation(_))));
        }

        assert!(service.store.articles.is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_category_rejected() {
        let service = service();
        let bad = ArticleSubmission {
            category_id: Some("opini".to_string()),
            ..submission("x")
        };

        let result = service.submit(bad, None).await;

        assert!(matches!(result, Err(ContentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cover_recorded_on_submission() {
        let service = service();

        let id = service
            .submit(submission("Bersampul"), Some(cover("image/jpeg", 32)))
            .await
            .unwrap();
        let article = service.get(id).await.unwrap();

        let url = article.cover_url.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".jpg"));
        assert_eq!(service.uploads_len(), 1);
    }

    #[tokio::test]
    async fn test_bad_cover_persists_nothing() {
        let service = service();

        let wrong_type = service
            .submit(submission("a"), Some(cover("text/plain", 8)))
            .await;
        let too_big = service
            .submit(submission("b"), Some(cover("image/png", MAX_COVER_BYTES + 1)))
            .await;

        assert!(matches!(
            wrong_type,
            Err(ContentError::Upload(UploadError::Rejected(_)))
        ));
        assert!(matches!(
            too_big,
            Err(ContentError::Upload(UploadError::Rejected(_)))
        ));
        assert!(service.store.articles.is_empty());
        assert_eq!(service.uploads_len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_text_fields_do_not_store_cover() {
        let service = service();
        let bad = ArticleSubmission {
            title: None,
            ..submission("x")
        };

        let result = service.submit(bad, Some(cover("image/png", 8))).await;

        assert!(matches!(result, Err(ContentError::Validation(_))));
        assert_eq!(service.uploads_len(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_discards_cover() {
        let service = service();
        service.store.fail_inserts.store(true, Ordering::SeqCst);

        let result = service
            .submit(submission("x"), Some(cover("image/png", 8)))
            .await;

        assert!(matches!(result, Err(ContentError::StorageError(_))));
        assert_eq!(service.uploads_len(), 0);
    }

    #[tokio::test]
    async fn test_any_status_transition_allowed() {
        let service = service();
        let id = service.submit(submission("x"), None).await.unwrap();

        for status in [
            ArticleStatus::Approved,
            ArticleStatus::Rejected,
            ArticleStatus::Approved,
            ArticleStatus::Pending,
        ] {
            service.set_status(id, status).await.unwrap();
            assert_eq!(service.get(id).await.unwrap().status, status);
        }
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let service = service();

        assert!(matches!(
            service.set_status(42, ArticleStatus::Approved).await,
            Err(ContentError::NotFound(42))
        ));
        assert!(matches!(
            service.set_highlight(42).await,
            Err(ContentError::NotFound(42))
        ));
        assert!(matches!(
            service.delete(42).await,
            Err(ContentError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_highlight_is_exclusive() {
        let service = service();
        let a = service.submit(submission("a"), None).await.unwrap();
        let _b = service.submit(submission("b"), None).await.unwrap();
        let c = service.submit(submission("c"), None).await.unwrap();

        service.set_highlight(a).await.unwrap();
        assert_eq!(service.store.highlighted(), vec![a]);

        service.set_highlight(c).await.unwrap();
        assert_eq!(service.store.highlighted(), vec![c]);

        // Highlighting the same article twice keeps exactly one
        service.set_highlight(c).await.unwrap();
        assert_eq!(service.store.highlighted(), vec![c]);

        // A failed highlight leaves the previous one in place
        assert!(service.set_highlight(999).await.is_err());
        assert_eq!(service.store.highlighted(), vec![c]);

        service.clear_highlight(c).await.unwrap();
        assert!(service.store.highlighted().is_empty());
    }

    #[tokio::test]
    async fn test_public_feed_is_approved_highlight_first() {
        let service = service();
        let old = service.submit(submission("old"), None).await.unwrap();
        let featured = service.submit(submission("featured"), None).await.unwrap();
        let newest = service.submit(submission("newest"), None).await.unwrap();
        let hidden = service.submit(submission("hidden"), None).await.unwrap();

        for id in [old, featured, newest] {
            service.set_status(id, ArticleStatus::Approved).await.unwrap();
        }
        service.set_status(hidden, ArticleStatus::Rejected).await.unwrap();
        service.set_highlight(featured).await.unwrap();

        let feed = service.list(StatusFilter::default()).await.unwrap();
        let ids: Vec<i64> = feed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![featured, newest, old]);

        let all = service.list(StatusFilter::All).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![featured, hidden, newest, old]);
    }

    #[tokio::test]
    async fn test_empty_and_blank_updates_rejected() {
        let service = service();
        let id = service.submit(submission("x"), None).await.unwrap();

        assert!(matches!(
            service.update(id, ArticleUpdate::default()).await,
            Err(ContentError::EmptyUpdate)
        ));

        let blank_title = ArticleUpdate {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(id, blank_title).await,
            Err(ContentError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_edit_fields() {
        let service = service();
        let id = service.submit(submission("draft"), None).await.unwrap();

        let edit = ArticleUpdate {
            title: Some("final".to_string()),
            content: Some("<p>y</p>".to_string()),
            category_id: Some(3),
            ..Default::default()
        };
        service.update(id, edit).await.unwrap();

        let article = service.get(id).await.unwrap();
        assert_eq!(article.title, "final");
        assert_eq!(article.content, "<p>y</p>");
        assert_eq!(article.category_id, Some(3));
        assert_eq!(article.status, ArticleStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_removes_article() {
        let service = service();
        let id = service.submit(submission("x"), None).await.unwrap();

        service.delete(id).await.unwrap();

        assert!(matches!(
            service.get(id).await,
            Err(ContentError::NotFound(_))
        ));
    }

    impl ContentService<MockContentStore, MockCoverStorage> {
        fn uploads_len(&self) -> usize {
            self.uploads.storage().files.len()
        }
    }
}
