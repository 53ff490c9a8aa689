// Core content module - articles and the moderation workflow.
// Following the same layout as the other core modules.

pub mod content_models;
pub mod content_service;

pub use content_models::*;
pub use content_service::*;
