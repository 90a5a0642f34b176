//! Learning roadmap generation
//!
//! Model-only: there is no meaningful local roadmap, so a model failure is
//! returned to the caller.

use tracing::info;
use uuid::Uuid;

use crate::ai::{AiClient, ModelRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::{Roadmap, RoadmapRequest, RoadmapResult};
use crate::prompts::assessment::build_roadmap_prompt;
use crate::scoring::enqueue_sync;
use crate::AppState;

pub const DEFAULT_TIMEFRAME_WEEKS: u32 = 12;
pub const DEFAULT_HOURS_PER_WEEK: u32 = 10;
const MAX_TIMEFRAME_WEEKS: u32 = 52;
const MAX_HOURS_PER_WEEK: u32 = 60;

/// Generate a roadmap and queue it for sync
pub async fn generate_roadmap(state: &AppState, request: RoadmapRequest) -> ApiResult<RoadmapResult> {
    let result = evaluate_roadmap(&state.ai, &request).await?;
    enqueue_sync(state, "roadmap", request.user_id.clone(), Uuid::new_v4(), &result);
    Ok(result)
}

/// Generate without side effects
pub async fn evaluate_roadmap(ai: &AiClient, request: &RoadmapRequest) -> ApiResult<RoadmapResult> {
    let target_role = request
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::invalid("Missing required field: target_role"))?;
    if request.skill_gaps.iter().all(|s| s.trim().is_empty()) {
        return Err(ApiError::invalid("Missing required field: skill_gaps"));
    }

    let weeks = request
        .timeframe_weeks
        .unwrap_or(DEFAULT_TIMEFRAME_WEEKS)
        .clamp(1, MAX_TIMEFRAME_WEEKS);
    let hours = request
        .hours_per_week
        .unwrap_or(DEFAULT_HOURS_PER_WEEK)
        .clamp(1, MAX_HOURS_PER_WEEK);

    let prompt = build_roadmap_prompt(
        target_role,
        &request.skill_gaps,
        &request.current_skills,
        weeks,
        hours,
        request.accessibility_needs.as_deref(),
    );

    let roadmap: Roadmap = ai
        .call_structured(&ModelRequest::text(prompt), "roadmap")
        .await?;

    info!(
        target_role,
        milestones = roadmap.milestones.len(),
        total_weeks = roadmap.total_weeks,
        "Roadmap generated"
    );

    Ok(RoadmapResult {
        target_role: target_role.to_string(),
        roadmap,
    })
}
