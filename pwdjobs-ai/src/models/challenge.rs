//! Challenge scoring payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ModelOutput;
use crate::types::{RubricScore, ScoreSource};

/// A rubric line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricCriterion {
    #[serde(alias = "name")]
    pub criterion: String,
    pub max_points: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Challenge definition sent along with the submission
#[derive(Debug, Clone, Deserialize)]
pub struct Challenge {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rubric: Vec<RubricCriterion>,
    /// Job the challenge belongs to (prompt context)
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// POST /api/challenge/score body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChallengeScoringRequest {
    pub submission_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub challenge: Option<Challenge>,
    pub submission: Option<String>,
}

/// Challenge scoring result
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeScoringResult {
    pub submission_id: Uuid,
    pub challenge_id: Option<String>,
    /// Final score, clamped to [0, 100]
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
    pub rubric_scores: Vec<RubricScore>,
    /// Sum of `rubric_scores[].score`; may differ from `score`
    pub rubric_total: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub word_count: usize,
    pub source: ScoreSource,
    pub degraded: bool,
}

/// Model output under `scoring`
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeScoring {
    pub rubric_scores: Vec<RubricScore>,
    pub final_score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl ModelOutput for ChallengeScoring {
    fn validate(&self) -> Result<(), String> {
        if !self.final_score.is_finite() {
            return Err("final_score is not a number".to_string());
        }
        if self.rubric_scores.is_empty() {
            return Err("rubric_scores is empty".to_string());
        }
        if let Some(bad) = self
            .rubric_scores
            .iter()
            .find(|r| !r.score.is_finite() || !r.max_points.is_finite())
        {
            return Err(format!("rubric score for `{}` is not a number", bad.criterion));
        }
        Ok(())
    }
}
