use crate::core::categories::CategoryError;
use crate::core::content::ContentError;
use crate::core::settings::SettingsError;
use crate::core::uploads::UploadError;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Internal Server Error";

/// Every failure a handler can report. Rendered as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("{0}")]
    NotFound(String),

    /// `message` goes to the client, `detail` only to the log.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    fn internal(detail: impl ToString) -> Self {
        ApiError::Internal {
            message: GENERIC_FAILURE,
            detail: detail.to_string(),
        }
    }

    /// Replace the client-facing text of an internal error. Other kinds pass through.
    pub fn with_message(self, message: &'static str) -> Self {
        match self {
            ApiError::Internal { detail, .. } => ApiError::Internal { message, detail },
            other => other,
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(msg) => ApiError::BadRequest(msg),
            ContentError::EmptyUpdate => ApiError::BadRequest(err.to_string()),
            ContentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ContentError::Upload(upload) => upload.into(),
            ContentError::StorageError(_) => ApiError::internal(err),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected(msg) => ApiError::Upload(msg),
            UploadError::StorageError(_) => ApiError::internal(err),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::Invalid | CategoryError::Duplicate => {
                ApiError::BadRequest(err.to_string())
            }
            CategoryError::StorageError(_) => ApiError::internal(err),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        ApiError::internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// Covers malformed bodies and covers that blow past the request size limit.
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload(err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
