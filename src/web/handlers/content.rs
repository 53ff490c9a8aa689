// Content endpoints - the public feed, submissions, and admin moderation.

use crate::core::content::{
    ArticleStatus, ArticleSubmission, ArticleUpdate, ArticleView, StatusFilter,
};
use crate::core::uploads::CoverUpload;
use crate::web::{ApiError, AppState};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    status: Option<String>,
}

/// Admin edits. Every field is optional; at least one must be present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    status: Option<String>,
    is_highlight: Option<HighlightFlag>,
    title: Option<String>,
    content: Option<String>,
    category_id: Option<i64>,
}

/// The dashboard sends `1`/`0`; `true`/`false` is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HighlightFlag {
    Bool(bool),
    Number(i64),
}

impl HighlightFlag {
    fn into_bool(self) -> Result<bool, ApiError> {
        match self {
            HighlightFlag::Bool(on) => Ok(on),
            HighlightFlag::Number(1) => Ok(true),
            HighlightFlag::Number(0) => Ok(false),
            HighlightFlag::Number(other) => Err(ApiError::BadRequest(format!(
                "is_highlight must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl UpdateRequest {
    fn into_update(self) -> Result<ArticleUpdate, ApiError> {
        let status = self
            .status
            .map(|s| s.parse::<ArticleStatus>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let is_highlight = self.is_highlight.map(HighlightFlag::into_bool).transpose()?;

        Ok(ArticleUpdate {
            status,
            is_highlight,
            title: self.title,
            content: self.content,
            category_id: self.category_id,
        })
    }
}

pub async fn list_content(
    State(state): State<AppState>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<Vec<ArticleView>>, ApiError> {
    let Query(query) = query?;
    let filter = StatusFilter::parse(query.status.as_deref())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let items = state
        .content
        .list(filter)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to fetch content"))?;

    Ok(Json(items))
}

pub async fn get_content(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ArticleView>, ApiError> {
    let Path(id) = id?;

    let article = state
        .content
        .get(id)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to fetch content"))?;

    Ok(Json(article))
}

/// Accepts the multipart submission form. Unknown fields are skipped.
pub async fn submit_content(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart?;
    let mut submission = ArticleSubmission::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cover" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked
                if file_name.as_deref().is_some_and(|n| !n.is_empty()) || !bytes.is_empty() {
                    cover = Some(CoverUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "title" => submission.title = Some(field.text().await?),
            "category_id" => submission.category_id = Some(field.text().await?),
            "content" => submission.content = Some(field.text().await?),
            "author_name" => submission.author_name = Some(field.text().await?),
            "author_email" => submission.author_email = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown submission field"),
        }
    }

    let id = state
        .content
        .submit(submission, cover)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to save content to database"))?;

    Ok(Json(json!({ "id": id })))
}

pub async fn update_content(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let update = request.into_update()?;
    let content = &state.content;

    // Single-purpose moderation actions from the dashboard get their own
    // service calls; anything else is a general edit.
    let result = match update {
        ArticleUpdate {
            status: Some(status),
            is_highlight: None,
            title: None,
            content: None,
            category_id: None,
        } => content.set_status(id, status).await,
        ArticleUpdate {
            status: None,
            is_highlight: Some(true),
            title: None,
            content: None,
            category_id: None,
        } => content.set_highlight(id).await,
        ArticleUpdate {
            status: None,
            is_highlight: Some(false),
            title: None,
            content: None,
            category_id: None,
        } => content.clear_highlight(id).await,
        update => content.update(id, update).await,
    };
    result.map_err(|e| ApiError::from(e).with_message("Failed to update content"))?;

    Ok(Json(json!({ "success": true })))
}

pub async fn delete_content(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;

    state
        .content
        .delete(id)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to delete content"))?;

    Ok(Json(json!({ "success": true })))
}
