//! Challenge scoring
//!
//! The model scores each rubric criterion and gives a final score. When the
//! model is unavailable the word-count heuristic supplies the final score and
//! the rubric lines are filled proportionally.

use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{AiClient, ModelRequest};
use crate::config::ScoringSettings;
use crate::db::results::save_challenge_result;
use crate::error::{ApiError, ApiResult};
use crate::models::{Challenge, ChallengeScoring, ChallengeScoringRequest, ChallengeScoringResult, RubricCriterion};
use crate::prompts::scoring::build_challenge_prompt;
use crate::scoring::fallback::{fallback_feedback, fallback_score, word_count};
use crate::scoring::{enqueue_sync, persist_best_effort};
use crate::types::{clamp_score, round1, RubricScore, ScoreSource};
use crate::AppState;

/// Rubric sum and final score may disagree by this much before it is logged
const RUBRIC_SUM_TOLERANCE: f64 = 0.5;

/// Score a challenge submission, persist it and queue it for sync
pub async fn score_challenge(
    state: &AppState,
    request: ChallengeScoringRequest,
) -> ApiResult<ChallengeScoringResult> {
    let result = evaluate_challenge(&state.ai, &state.scoring, &request).await?;

    persist_best_effort(
        state,
        "challenge_result",
        save_challenge_result(&state.db, request.user_id.as_deref(), &result),
    )
    .await;
    enqueue_sync(state, "challenge_result", request.user_id.clone(), result.submission_id, &result);

    Ok(result)
}

/// Rubric used when the challenge does not bring its own
pub fn default_rubric() -> Vec<RubricCriterion> {
    [
        ("Correctness", 40.0, "The solution does what the challenge asks"),
        ("Completeness", 30.0, "Every part of the challenge is addressed"),
        ("Clarity", 30.0, "The work is organized and easy to follow"),
    ]
    .into_iter()
    .map(|(criterion, max_points, description)| RubricCriterion {
        criterion: criterion.to_string(),
        max_points,
        description: Some(description.to_string()),
    })
    .collect()
}

/// Reject requests that cannot be scored
pub fn validate_challenge_request(request: &ChallengeScoringRequest) -> ApiResult<(&Challenge, &str)> {
    let challenge = request
        .challenge
        .as_ref()
        .ok_or_else(|| ApiError::invalid("Missing required field: challenge"))?;
    let submission = request
        .submission
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid("Missing required field: submission"))?;
    Ok((challenge, submission))
}

/// Score without side effects
pub async fn evaluate_challenge(
    ai: &AiClient,
    settings: &ScoringSettings,
    request: &ChallengeScoringRequest,
) -> ApiResult<ChallengeScoringResult> {
    let (challenge, submission) = validate_challenge_request(request)?;
    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);
    let words = word_count(submission);

    let rubric = if challenge.rubric.is_empty() {
        default_rubric()
    } else {
        challenge.rubric.clone()
    };

    let prompt = build_challenge_prompt(challenge, &rubric, submission);
    let scored = match ai
        .call_structured::<ChallengeScoring>(&ModelRequest::text(prompt), "scoring")
        .await
    {
        Ok(scoring) => from_model(scoring),
        Err(e) => {
            warn!(%submission_id, error = %e, "Challenge scoring unavailable; using word-count fallback");
            from_word_count(&rubric, words)
        }
    };

    let threshold = settings.challenge_pass_threshold;
    let degraded = scored.source == ScoreSource::Fallback;

    info!(
        %submission_id,
        score = scored.score,
        threshold,
        words,
        degraded,
        "Challenge scored"
    );

    Ok(ChallengeScoringResult {
        submission_id,
        challenge_id: challenge.id.clone(),
        score: scored.score,
        threshold,
        passed: scored.score >= threshold,
        rubric_total: round1(scored.rubric_scores.iter().map(|r| r.score).sum()),
        rubric_scores: scored.rubric_scores,
        feedback: scored.feedback,
        strengths: scored.strengths,
        improvements: scored.improvements,
        word_count: words,
        source: scored.source,
        degraded,
    })
}

struct Scored {
    score: f64,
    rubric_scores: Vec<RubricScore>,
    feedback: String,
    strengths: Vec<String>,
    improvements: Vec<String>,
    source: ScoreSource,
}

fn from_model(scoring: ChallengeScoring) -> Scored {
    let rubric_scores: Vec<RubricScore> = scoring
        .rubric_scores
        .into_iter()
        .map(|r| {
            let max_points = r.max_points.max(0.0);
            RubricScore {
                score: round1(r.score.clamp(0.0, max_points)),
                max_points,
                ..r
            }
        })
        .collect();

    let score = round1(clamp_score(scoring.final_score));
    let rubric_sum: f64 = rubric_scores.iter().map(|r| r.score).sum();
    if (rubric_sum - score).abs() > RUBRIC_SUM_TOLERANCE {
        // Final score stays authoritative; the sum is reported alongside it
        warn!(
            final_score = score,
            rubric_sum,
            "Model rubric scores do not add up to the final score"
        );
    }

    Scored {
        score,
        rubric_scores,
        feedback: scoring.feedback,
        strengths: scoring.strengths,
        improvements: scoring.improvements,
        source: ScoreSource::Model,
    }
}

fn from_word_count(rubric: &[RubricCriterion], words: usize) -> Scored {
    let score = fallback_score(words);
    let rubric_scores = rubric
        .iter()
        .map(|c| RubricScore {
            criterion: c.criterion.clone(),
            score: round1(c.max_points * score / 100.0),
            max_points: c.max_points,
            feedback: String::new(),
        })
        .collect();

    Scored {
        score,
        rubric_scores,
        feedback: fallback_feedback(words),
        strengths: Vec::new(),
        improvements: Vec::new(),
        source: ScoreSource::Fallback,
    }
}
