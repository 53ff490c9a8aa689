use crate::core::settings::SettingsUpdate;
use crate::web::{ApiError, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let settings = state
        .settings
        .get()
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to fetch settings"))?;

    Ok(Json(settings))
}

pub async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) = payload?;

    state
        .settings
        .set(update)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to save settings"))?;

    Ok(Json(json!({ "success": true })))
}
