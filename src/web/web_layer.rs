// Web layer - HTTP routes and handlers.
// Translates requests into core service calls and errors into JSON responses.

#[path = "error.rs"]
pub mod error;

#[path = "state.rs"]
pub mod state;

#[path = "routes.rs"]
pub mod routes;

#[path = "handlers/handlers.rs"]
pub mod handlers;

pub use error::ApiError;
pub use state::AppState;
