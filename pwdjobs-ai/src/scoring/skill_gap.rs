//! Skill-gap assessment
//!
//! Skill matching is local and deterministic; the model only writes the
//! narrative analysis on top of it.

use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{AiClient, ModelRequest};
use crate::db::results::save_skill_assessment;
use crate::error::{ApiError, ApiResult};
use crate::models::{SkillGapAnalysis, SkillGapRequest, SkillGapResult};
use crate::prompts::assessment::build_skill_gap_prompt;
use crate::scoring::{enqueue_sync, persist_best_effort};
use crate::types::{round1, ScoreSource};
use crate::AppState;

/// Missing skills listed as priorities in the local analysis
const MAX_PRIORITY_SKILLS: usize = 5;

/// Assess a skill gap, persist it and queue it for sync
pub async fn assess_skill_gap(state: &AppState, request: SkillGapRequest) -> ApiResult<SkillGapResult> {
    let result = evaluate_skill_gap(&state.ai, &request).await?;

    persist_best_effort(
        state,
        "skill_assessment",
        save_skill_assessment(&state.db, request.user_id.as_deref(), &result),
    )
    .await;
    enqueue_sync(state, "skill_assessment", request.user_id.clone(), result.submission_id, &result);

    Ok(result)
}

/// Matched and missing required skills (case-insensitive)
///
/// Required skills keep their original spelling; duplicates are dropped.
pub fn match_skills(candidate: &[String], required: &[String]) -> (Vec<String>, Vec<String>) {
    let held: HashSet<String> = candidate
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for skill in required {
        let trimmed = skill.trim();
        let key = trimmed.to_lowercase();
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        if held.contains(&key) {
            matched.push(trimmed.to_string());
        } else {
            missing.push(trimmed.to_string());
        }
    }
    (matched, missing)
}

/// Assess without side effects
pub async fn evaluate_skill_gap(ai: &AiClient, request: &SkillGapRequest) -> ApiResult<SkillGapResult> {
    let target_role = request
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::invalid("Missing required field: target_role"))?;

    let (matched, missing) = match_skills(&request.candidate_skills, &request.required_skills);
    let total = matched.len() + missing.len();
    if total == 0 {
        return Err(ApiError::invalid("Missing required field: required_skills"));
    }
    let match_percentage = round1(matched.len() as f64 / total as f64 * 100.0);
    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);

    let prompt = build_skill_gap_prompt(
        target_role,
        &matched,
        &missing,
        match_percentage,
        request.experience_summary.as_deref(),
    );

    let (analysis, source) = match ai
        .call_structured::<SkillGapAnalysis>(&ModelRequest::text(prompt), "analysis")
        .await
    {
        Ok(analysis) => (analysis, ScoreSource::Model),
        Err(e) => {
            warn!(%submission_id, error = %e, "Skill-gap analysis unavailable; using local analysis");
            (
                local_analysis(target_role, &matched, &missing, match_percentage),
                ScoreSource::Local,
            )
        }
    };
    let degraded = source != ScoreSource::Model;

    info!(%submission_id, match_percentage, degraded, "Skill gap assessed");

    Ok(SkillGapResult {
        submission_id,
        target_role: target_role.to_string(),
        matched_skills: matched,
        missing_skills: missing,
        match_percentage,
        analysis,
        source,
        degraded,
    })
}

/// Readiness band from the match percentage
pub fn readiness_level(match_percentage: f64) -> &'static str {
    if match_percentage >= 80.0 {
        "ready"
    } else if match_percentage >= 50.0 {
        "nearly_ready"
    } else {
        "developing"
    }
}

fn local_analysis(target_role: &str, matched: &[String], missing: &[String], match_percentage: f64) -> SkillGapAnalysis {
    let summary = if missing.is_empty() {
        format!(
            "You already have every listed skill for {}. Focus on showing them in your applications.",
            target_role
        )
    } else {
        format!(
            "You have {} of {} skills listed for {} ({}%). Building the missing skills will \
             strengthen your application.",
            matched.len(),
            matched.len() + missing.len(),
            target_role,
            match_percentage
        )
    };

    let mut recommendations: Vec<String> = missing
        .iter()
        .take(MAX_PRIORITY_SKILLS)
        .map(|s| format!("Take a short course or practice project in {}", s))
        .collect();
    recommendations.push("Complete the skill quizzes and challenges for this role to show your progress".to_string());

    SkillGapAnalysis {
        summary,
        strengths: matched.to_vec(),
        priority_skills: missing.iter().take(MAX_PRIORITY_SKILLS).cloned().collect(),
        recommendations,
        readiness_level: Some(readiness_level(match_percentage).to_string()),
    }
}
