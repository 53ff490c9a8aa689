use crate::core::uploads::{MAX_COVER_BYTES, PUBLIC_PREFIX};
use crate::web::handlers::{categories, content, settings};
use crate::web::{ApiError, AppState};
use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::path::Path;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the application router.
///
/// `/api/*` carries the JSON surface, `/uploads/*` serves stored covers, and
/// when `static_dir` is given everything else falls through to the built
/// front-end with `index.html` as the SPA fallback.
pub fn router(state: AppState, upload_dir: &Path, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route(
            "/settings",
            get(settings::get_settings).post(settings::save_settings),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/content",
            get(content::list_content).post(content::submit_content),
        )
        .route(
            "/content/{id}",
            get(content::get_content)
                .patch(content::update_content)
                .delete(content::delete_content),
        )
        .fallback(api_not_found)
        .method_not_allowed_fallback(api_not_found)
        // Leave headroom above the cover limit for the text fields and framing
        .layer(DefaultBodyLimit::max(MAX_COVER_BYTES + 1024 * 1024));

    let mut app = Router::new()
        .nest("/api", api)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir));

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn api_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("API route {} {} not found", method, uri))
}
