// SQLite implementation of the ContentStore trait

use crate::core::content::{
    ArticleStatus, ArticleUpdate, ArticleView, ContentError, ContentStore, NewArticle,
    StatusFilter, TIMESTAMP_FORMAT,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};

const SELECT_VIEW: &str = r#"
    SELECT c.id, c.title, c.category_id, cat.name AS category_name, c.content,
           c.author_name, c.author_email, c.cover_url, c.status, c.is_highlight,
           c.created_at
    FROM content c
    LEFT JOIN categories cat ON c.category_id = cat.id
"#;

// Same-second inserts share a created_at, so the id breaks the tie
const FEED_ORDER: &str = " ORDER BY c.is_highlight DESC, c.created_at DESC, c.id DESC";

pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage(e: sqlx::Error) -> ContentError {
    ContentError::StorageError(e.to_string())
}

fn row_to_view(row: &SqliteRow) -> Result<ArticleView, ContentError> {
    let status: String = row.get("status");
    let status = status
        .parse::<ArticleStatus>()
        .map_err(|e| ContentError::StorageError(e.to_string()))?;

    let created_at: String = row.get("created_at");
    let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
        .map_err(|e| ContentError::StorageError(format!("Bad created_at {created_at:?}: {e}")))?;

    Ok(ArticleView {
        id: row.get("id"),
        title: row.get("title"),
        category_id: row.get("category_id"),
        category_name: row.get("category_name"),
        content: row.get("content"),
        author_name: row.get("author_name"),
        author_email: row.get("author_email"),
        cover_url: row.get("cover_url"),
        status,
        is_highlight: row.get::<i64, _>("is_highlight") != 0,
        created_at,
    })
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn insert(&self, article: NewArticle) -> Result<i64, ContentError> {
        let result = sqlx::query(
            r#"
            INSERT INTO content (title, category_id, content, author_name, author_email, cover_url, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(article.category_id)
        .bind(&article.content)
        .bind(&article.author_name)
        .bind(&article.author_email)
        .bind(&article.cover_url)
        .bind(ArticleStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<ArticleView>, ContentError> {
        let row = sqlx::query(&format!("{SELECT_VIEW} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.as_ref().map(row_to_view).transpose()
    }

    async fn list(&self, filter: StatusFilter) -> Result<Vec<ArticleView>, ContentError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_VIEW);
        if let StatusFilter::Only(status) = filter {
            query.push(" WHERE c.status = ").push_bind(status.as_str());
        }
        query.push(FEED_ORDER);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_view).collect()
    }

    async fn update(&self, id: i64, update: ArticleUpdate) -> Result<bool, ContentError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Writes come first so the transaction takes the write lock up front
        // instead of upgrading from a read.
        if update.has_field_changes() {
            let mut query = QueryBuilder::<Sqlite>::new("UPDATE content SET ");
            let mut fields = query.separated(", ");
            if let Some(status) = update.status {
                fields.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(title) = &update.title {
                fields.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(content) = &update.content {
                fields.push("content = ").push_bind_unseparated(content.clone());
            }
            if let Some(category_id) = update.category_id {
                fields.push("category_id = ").push_bind_unseparated(category_id);
            }
            query.push(" WHERE id = ").push_bind(id);

            let result = query.build().execute(&mut *tx).await.map_err(storage)?;
            if result.rows_affected() == 0 {
                return Ok(false);
            }
        }

        match update.is_highlight {
            Some(true) => {
                // One statement flips the flag on every row, so there is never
                // a moment with zero or two highlighted articles.
                let result = sqlx::query(
                    r#"
                    UPDATE content SET is_highlight = (id = ?)
                    WHERE EXISTS (SELECT 1 FROM content WHERE id = ?)
                    "#,
                )
                .bind(id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
                if result.rows_affected() == 0 {
                    return Ok(false);
                }
            }
            Some(false) => {
                let result = sqlx::query("UPDATE content SET is_highlight = 0 WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage)?;
                if result.rows_affected() == 0 {
                    return Ok(false);
                }
            }
            None => {}
        }

        tx.commit().await.map_err(storage)?;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, ContentError> {
        let result = sqlx::query("DELETE FROM content WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected() > 0)
    }
}
