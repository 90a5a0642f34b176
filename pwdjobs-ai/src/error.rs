//! Error types for pwdjobs-ai
//!
//! Every user-facing failure becomes a JSON body `{ "error": ..., "detail"?: ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai::AiError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("{0}")]
    InvalidRequest(String),

    /// Both model providers failed and the flow has no local fallback (500)
    #[error("AI model unavailable: {0}")]
    ModelUnavailable(String),

    /// pwdjobs-common error
    #[error("Common error: {0}")]
    Common(#[from] pwdjobs_common::Error),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::ModelUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::ModelUnavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI model unavailable, please try again later".to_string(),
                Some(msg),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(err.to_string()),
            ),
        };

        let body = match detail {
            Some(detail) => json!({ "error": error, "detail": detail }),
            None => json!({ "error": error }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
