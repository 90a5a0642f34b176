//! Verification endpoints

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use tracing::info;

use super::{parse_body, Success};
use crate::models::verification::{CategoryCheckRequest, RegistryCheckRequest};
use crate::models::{DocumentVerificationRequest, DocumentVerificationResult, LivenessRequest, LivenessResult};
use crate::services::RegistryCheck;
use crate::validators::{normalize_id_number, validate_category, CategoryValidation};
use crate::verification::{check_liveness, verify_document};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/verification/category
///
/// An unrecognized category or a medical diagnosis is still a 200; the body
/// carries `valid: false` and a suggestion.
pub async fn category_handler(
    payload: Result<Json<CategoryCheckRequest>, JsonRejection>,
) -> ApiResult<Json<Success<CategoryValidation>>> {
    let request = parse_body(payload)?;
    let category = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::invalid("Missing required field: category"))?;

    let validation = validate_category(category);
    info!(
        valid = validation.valid,
        is_medical_diagnosis = validation.is_medical_diagnosis,
        "Disability category checked"
    );
    Ok(Success::new(validation))
}

/// POST /api/verification/registry
///
/// Never fails on registry trouble: an unreachable registry is an
/// `unreachable` outcome, not an error response.
pub async fn registry_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegistryCheckRequest>, JsonRejection>,
) -> ApiResult<Json<Success<RegistryCheck>>> {
    let request = parse_body(payload)?;
    let id_number = normalize_id_number(request.id_number.as_deref().unwrap_or(""))
        .map_err(ApiError::invalid)?;

    let check = state.registry.check(&id_number).await;
    Ok(Success::new(check))
}

/// POST /api/verification/liveness
pub async fn liveness_handler(
    State(state): State<AppState>,
    payload: Result<Json<LivenessRequest>, JsonRejection>,
) -> ApiResult<Json<Success<LivenessResult>>> {
    let request = parse_body(payload)?;
    let result = check_liveness(&state, request).await?;
    Ok(Success::new(result))
}

/// POST /api/verification/document
pub async fn document_handler(
    State(state): State<AppState>,
    payload: Result<Json<DocumentVerificationRequest>, JsonRejection>,
) -> ApiResult<Json<Success<DocumentVerificationResult>>> {
    let request = parse_body(payload)?;
    let result = verify_document(&state, request).await?;
    Ok(Success::new(result))
}

/// Build verification routes
pub fn verification_routes() -> Router<AppState> {
    Router::new()
        .route("/api/verification/category", post(category_handler))
        .route("/api/verification/registry", post(registry_handler))
        .route("/api/verification/liveness", post(liveness_handler))
        .route("/api/verification/document", post(document_handler))
}
