//! HTTP API handlers for pwdjobs-ai
//!
//! JSON in, JSON out. Success bodies are `{ "success": true, ...result }`;
//! errors are `{ "error": ..., "detail"?: ... }` (see [`crate::error`]).

pub mod assessment;
pub mod challenge;
pub mod health;
pub mod quiz;
pub mod verification;

pub use assessment::assessment_routes;
pub use challenge::challenge_routes;
pub use health::health_routes;
pub use quiz::quiz_routes;
pub use verification::verification_routes;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Success envelope; the result's fields are flattened next to `success`
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub inner: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(inner: T) -> Json<Self> {
        Json(Self { success: true, inner })
    }
}

/// Turn a JSON extraction failure into a 400 with the usual error body
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid(format!("Invalid JSON body: {}", rejection.body_text())))
}
