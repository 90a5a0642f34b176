//! Quiz scoring payloads

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::ai::ModelOutput;
use crate::types::ScoreSource;

/// Question type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Scored locally against `correct_answer`
    #[default]
    SingleChoice,
    /// Scored by the model (word-count fallback)
    OpenEnded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    /// Points for an open-ended question (defaults to the single-choice value)
    pub points: Option<f64>,
    /// What a good open-ended answer covers
    pub guidance: Option<String>,
}

/// POST /api/quiz/score body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuizScoringRequest {
    /// Client-supplied id makes persistence retries idempotent
    pub submission_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub quiz_id: Option<String>,
    /// Skill the quiz assesses (prompt context)
    pub skill: Option<String>,
    pub questions: Vec<QuizQuestion>,
    /// Question id → answer
    pub answers: Option<HashMap<String, String>>,
}

/// Per-question outcome
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub kind: QuestionKind,
    /// Only set for single-choice questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    pub awarded: f64,
    pub max_points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub source: ScoreSource,
}

/// Quiz scoring result
#[derive(Debug, Clone, Serialize)]
pub struct QuizScoringResult {
    pub submission_id: Uuid,
    pub quiz_id: Option<String>,
    /// Percentage of the available points, in [0, 100]
    pub score: f64,
    /// Points awarded across all questions
    pub raw_score: f64,
    /// Points available across all questions
    pub max_score: f64,
    pub threshold: f64,
    pub passed: bool,
    pub correct_count: usize,
    pub question_results: Vec<QuestionResult>,
    /// True when any open-ended answer fell back to the word-count heuristic
    pub degraded: bool,
}

/// Model output under `scoring` for open-ended answers
#[derive(Debug, Clone, Deserialize)]
pub struct OpenEndedScoring {
    pub answers: Vec<OpenEndedAnswerScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenEndedAnswerScore {
    pub question_id: String,
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

impl ModelOutput for OpenEndedScoring {
    fn validate(&self) -> Result<(), String> {
        if self.answers.iter().any(|a| !a.score.is_finite()) {
            return Err("non-finite answer score".to_string());
        }
        Ok(())
    }
}
