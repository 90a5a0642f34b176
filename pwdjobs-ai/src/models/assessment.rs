//! Skill-gap analysis and roadmap payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ModelOutput;
use crate::types::ScoreSource;

/// POST /api/assessment/skill-gap body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillGapRequest {
    pub submission_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub target_role: Option<String>,
    pub candidate_skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub experience_summary: Option<String>,
}

/// Model output under `analysis`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapAnalysis {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub priority_skills: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// "ready", "nearly_ready" or "developing"
    #[serde(default)]
    pub readiness_level: Option<String>,
}

impl ModelOutput for SkillGapAnalysis {
    fn validate(&self) -> Result<(), String> {
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        Ok(())
    }
}

/// Skill-gap result
#[derive(Debug, Clone, Serialize)]
pub struct SkillGapResult {
    pub submission_id: Uuid,
    pub target_role: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Share of required skills already held, 0-100
    pub match_percentage: f64,
    pub analysis: SkillGapAnalysis,
    pub source: ScoreSource,
    pub degraded: bool,
}

/// POST /api/assessment/roadmap body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoadmapRequest {
    pub user_id: Option<String>,
    pub target_role: Option<String>,
    pub skill_gaps: Vec<String>,
    pub current_skills: Vec<String>,
    pub timeframe_weeks: Option<u32>,
    pub hours_per_week: Option<u32>,
    /// Free-text accommodations the learning plan should respect
    pub accessibility_needs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub start_week: u32,
    pub end_week: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub resources: Vec<LearningResource>,
}

/// Model output under `roadmap`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub total_weeks: u32,
    pub milestones: Vec<Milestone>,
}

impl ModelOutput for Roadmap {
    fn validate(&self) -> Result<(), String> {
        if self.milestones.is_empty() {
            return Err("roadmap has no milestones".to_string());
        }
        if let Some(m) = self.milestones.iter().find(|m| m.start_week > m.end_week) {
            return Err(format!(
                "milestone `{}` ends (week {}) before it starts (week {})",
                m.title, m.end_week, m.start_week
            ));
        }
        Ok(())
    }
}

/// Roadmap result
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapResult {
    pub target_role: String,
    pub roadmap: Roadmap,
}
