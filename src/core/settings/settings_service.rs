// Site settings - the two display strings the admin can edit.
//
// The key set is fixed and seeded by the database bootstrap; at runtime
// values are only ever overwritten.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    HeaderTitle,
    TickerText,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::HeaderTitle => "header_title",
            SettingKey::TickerText => "ticker_text",
        }
    }
}

/// Partial settings edit. Unknown keys in the request body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub header_title: Option<String>,
    pub ticker_text: Option<String>,
}

impl SettingsUpdate {
    /// The (key, value) pairs that should be written. Empty strings count as
    /// not provided so a half-filled form never blanks a setting.
    pub fn changes(self) -> Vec<(SettingKey, String)> {
        [
            (SettingKey::HeaderTitle, self.header_title),
            (SettingKey::TickerText, self.ticker_text),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_all(&self) -> Result<BTreeMap<String, String>, SettingsError>;

    /// Write all values in one transaction.
    async fn save(&self, changes: &[(SettingKey, String)]) -> Result<(), SettingsError>;
}

pub struct SettingsService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        self.store.get_all().await
    }

    pub async fn set(&self, update: SettingsUpdate) -> Result<(), SettingsError> {
        let changes = update.changes();
        if changes.is_empty() {
            return Ok(());
        }

        self.store.save(&changes).await?;

        let keys: Vec<&str> = changes.iter().map(|(k, _)| k.as_str()).collect();
        tracing::info!(?keys, "Settings updated");
        Ok(())
    }
}
