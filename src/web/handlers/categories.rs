use crate::core::categories::Category;
use crate::web::{ApiError, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    name: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to fetch categories"))?;

    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(body) = payload?;

    let category = state
        .categories
        .create(body.name.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to add category"))?;

    Ok(Json(category))
}
