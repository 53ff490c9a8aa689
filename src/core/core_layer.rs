// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "content/mod.rs"]
pub mod content;

#[path = "categories/category_service.rs"]
pub mod categories;

#[path = "settings/settings_service.rs"]
pub mod settings;

#[path = "uploads/mod.rs"]
pub mod uploads;
