use crate::core::settings::{SettingKey, SettingsError, SettingsStore};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::BTreeMap;

pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage(e: sqlx::Error) -> SettingsError {
    SettingsError::StorageError(e.to_string())
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok(rows
            .iter()
            .map(|row| {
                let value: Option<String> = row.get("value");
                (row.get("key"), value.unwrap_or_default())
            })
            .collect())
    }

    async fn save(&self, changes: &[(SettingKey, String)]) -> Result<(), SettingsError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Keys are seeded at startup, so this is a plain overwrite.
        for (key, value) in changes {
            sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
                .bind(value)
                .bind(key.as_str())
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        Ok(())
    }
}
