// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "database.rs"]
pub mod database;

#[path = "content/mod.rs"]
pub mod content;

#[path = "categories/sqlite_category_store.rs"]
pub mod categories;

#[path = "settings/sqlite_settings_store.rs"]
pub mod settings;

#[path = "uploads/disk_cover_storage.rs"]
pub mod uploads;
