// SQLite bootstrap - one pool shared by every store.
//
// Tables:
// - categories: article categories (seeded with the default set)
// - content: articles with moderation status and highlight flag
// - settings: fixed key set for the site header and ticker

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open (and create if needed) the database at `database_url`.
///
/// Accepts either a bare file path or a `sqlite:` URL.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    // Ensure the file exists if it's a file path
    let path_str = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_str = path_str.split('?').next().unwrap_or(path_str);
    if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
        if let Some(parent) = Path::new(path_str).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::File::create(path_str)?;
    }

    let conn_str = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    };

    // Articles may point at a category that does not exist (or no longer
    // does); the feed shows them with a null category name.
    let options = SqliteConnectOptions::from_str(&conn_str)?.foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create tables and seed rows. Safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category_id INTEGER,
            content TEXT NOT NULL,
            author_name TEXT NOT NULL,
            author_email TEXT,
            cover_url TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            is_highlight INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Feed queries filter by status and sort by highlight then recency
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_content_feed
        ON content(status, is_highlight DESC, created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    seed(pool).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn seed(pool: &SqlitePool) -> anyhow::Result<()> {
    let settings = [
        ("header_title", "Keramas"),
        (
            "ticker_text",
            "Selamat datang di Keramas - Majalah Digital Kebanggaan Kita.",
        ),
    ];
    for (key, value) in settings {
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    for name in ["Umum", "Berita", "Opini", "Sastra"] {
        sqlx::query("INSERT OR IGNORE INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool(dir: &tempfile::TempDir) -> SqlitePool {
    let path = dir.path().join("keramas.db");
    let pool = connect(path.to_str().unwrap()).await.unwrap();
    migrate(&pool).await.unwrap();
    pool
}
