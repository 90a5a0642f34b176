//! Skill-gap and roadmap endpoints

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use super::{parse_body, Success};
use crate::models::{RoadmapRequest, RoadmapResult, SkillGapRequest, SkillGapResult};
use crate::scoring::roadmap::generate_roadmap;
use crate::scoring::skill_gap::assess_skill_gap;
use crate::{ApiResult, AppState};

/// POST /api/assessment/skill-gap
///
/// Falls back to a local analysis (`degraded: true`) when the model is unavailable.
pub async fn skill_gap_handler(
    State(state): State<AppState>,
    payload: Result<Json<SkillGapRequest>, JsonRejection>,
) -> ApiResult<Json<Success<SkillGapResult>>> {
    let request = parse_body(payload)?;
    let result = assess_skill_gap(&state, request).await?;
    Ok(Success::new(result))
}

/// POST /api/assessment/roadmap
///
/// **Errors:** 400 on missing role or skill gaps; 500 when the model is unavailable.
pub async fn roadmap_handler(
    State(state): State<AppState>,
    payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> ApiResult<Json<Success<RoadmapResult>>> {
    let request = parse_body(payload)?;
    let result = generate_roadmap(&state, request).await?;
    Ok(Success::new(result))
}

/// Build assessment routes
pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assessment/skill-gap", post(skill_gap_handler))
        .route("/api/assessment/roadmap", post(roadmap_handler))
}
