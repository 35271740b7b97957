//! Unified error handling and the response envelope.
//!
//! Every route handler returns `Result<Response, ApiError>`. Validation
//! failures short-circuit before any store or uploader call; collaborator
//! failures convert at the operation boundary and surface as 500 with the
//! underlying message. Nothing is retried and nothing is enriched beyond the
//! message text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::UploadError;

/// Standard response envelope used on every path except the bare
/// price-filter message (see [`ApiError::FilterMessage`]).
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Wrap response data in the success envelope.
pub fn success<T: Serialize>(data: T) -> Envelope<T> {
    Envelope {
        status: true,
        message: "Success".to_string(),
        data: Some(data),
    }
}

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing, or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// Duplicate title.
    #[error("{0}")]
    Conflict(String),

    /// No matching active record.
    #[error("{0}")]
    NotFound(String),

    /// Price-filter parse failures answer with a bare `{"message"}` body and
    /// no `status` field, a deliberately distinct lightweight path.
    #[error("{0}")]
    FilterMessage(String),

    /// Store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Image upload failed.
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// Anything else unexpected at the operation boundary.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Store(_) | Self::Upload(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        match self {
            Self::FilterMessage(message) => {
                (StatusCode::OK, Json(json!({ "message": message }))).into_response()
            }
            other => {
                let status = match &other {
                    Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
                    Self::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let envelope = Envelope::<()> {
                    status: false,
                    message: other.to_string(),
                    data: None,
                };

                (status, Json(envelope)).into_response()
            }
        }
    }
}
