// One file per API resource.

#[path = "categories.rs"]
pub mod categories;

#[path = "content.rs"]
pub mod content;

#[path = "settings.rs"]
pub mod settings;
