//! Quiz scoring
//!
//! Single-choice questions are scored locally first. Open-ended answers go to
//! the model in one call; any answer the model does not score falls back to
//! the word-count heuristic. The score is the share of available points, so
//! the pass threshold means the same for a two-question quiz as for a long one.

use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{AiClient, ModelRequest};
use crate::config::ScoringSettings;
use crate::db::results::save_quiz_result;
use crate::error::{ApiError, ApiResult};
use crate::models::quiz::{OpenEndedScoring, QuestionResult};
use crate::models::{QuestionKind, QuizQuestion, QuizScoringRequest, QuizScoringResult};
use crate::prompts::scoring::{build_open_ended_prompt, OpenEndedItem};
use crate::scoring::fallback::{fallback_feedback, fallback_score, word_count};
use crate::scoring::{enqueue_sync, persist_best_effort};
use crate::types::{clamp_score, round1, ScoreSource};
use crate::AppState;

/// Score a quiz, persist it and queue it for sync
pub async fn score_quiz(state: &AppState, request: QuizScoringRequest) -> ApiResult<QuizScoringResult> {
    let result = evaluate_quiz(&state.ai, &state.scoring, &request).await?;

    persist_best_effort(
        state,
        "quiz_result",
        save_quiz_result(&state.db, request.user_id.as_deref(), &result),
    )
    .await;
    enqueue_sync(state, "quiz_result", request.user_id.clone(), result.submission_id, &result);

    Ok(result)
}

/// Reject requests that cannot be scored
pub fn validate_quiz_request(request: &QuizScoringRequest) -> ApiResult<&HashMap<String, String>> {
    let answers = match &request.answers {
        Some(answers) if !answers.is_empty() => answers,
        _ => return Err(ApiError::invalid("Missing required field: answers")),
    };
    if request.questions.is_empty() {
        return Err(ApiError::invalid("Missing required field: questions"));
    }
    if let Some(q) = request
        .questions
        .iter()
        .find(|q| q.kind == QuestionKind::SingleChoice && q.correct_answer.is_none())
    {
        return Err(ApiError::invalid(format!(
            "Question `{}` is single_choice but has no correct_answer",
            q.id
        )));
    }
    Ok(answers)
}

/// Score without side effects
pub async fn evaluate_quiz(
    ai: &AiClient,
    settings: &ScoringSettings,
    request: &QuizScoringRequest,
) -> ApiResult<QuizScoringResult> {
    let answers = validate_quiz_request(request)?;
    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);

    let mut results: Vec<Option<QuestionResult>> = Vec::with_capacity(request.questions.len());
    let mut open_ended: Vec<(usize, &QuizQuestion, &str)> = Vec::new();

    // Local scoring runs before any model call
    for (idx, question) in request.questions.iter().enumerate() {
        let answer = answers.get(&question.id).map(|a| a.trim()).unwrap_or("");
        match question.kind {
            QuestionKind::SingleChoice => {
                results.push(Some(score_single_choice(
                    question,
                    answer,
                    settings.single_choice_points,
                )));
            }
            QuestionKind::OpenEnded => {
                let max_points = open_ended_points(question, settings);
                if answer.is_empty() {
                    results.push(Some(QuestionResult {
                        question_id: question.id.clone(),
                        kind: QuestionKind::OpenEnded,
                        correct: None,
                        awarded: 0.0,
                        max_points,
                        feedback: Some(fallback_feedback(0)),
                        source: ScoreSource::Local,
                    }));
                } else {
                    results.push(None);
                    open_ended.push((idx, question, answer));
                }
            }
        }
    }

    let mut degraded = false;
    if !open_ended.is_empty() {
        let model_scores = score_open_ended(ai, settings, request.skill.as_deref(), &open_ended).await;
        for (idx, question, answer) in &open_ended {
            let max_points = open_ended_points(question, settings);
            let scored = model_scores
                .as_ref()
                .and_then(|scores| scores.get(question.id.as_str()));
            let result = match scored {
                Some((score, feedback)) => QuestionResult {
                    question_id: question.id.clone(),
                    kind: QuestionKind::OpenEnded,
                    correct: None,
                    awarded: round1(score.max(0.0).min(max_points)),
                    max_points,
                    feedback: Some(feedback.clone()).filter(|f| !f.is_empty()),
                    source: ScoreSource::Model,
                },
                None => {
                    degraded = true;
                    fallback_result(question, answer, max_points)
                }
            };
            results[*idx] = Some(result);
        }
    }

    let question_results: Vec<QuestionResult> = results.into_iter().flatten().collect();
    let raw_total: f64 = question_results.iter().map(|r| r.awarded).sum();
    let max_score: f64 = question_results.iter().map(|r| r.max_points).sum();
    let score = percentage(raw_total, max_score);
    let correct_count = question_results.iter().filter(|r| r.correct == Some(true)).count();
    let threshold = settings.quiz_pass_threshold;

    info!(
        %submission_id,
        score,
        threshold,
        degraded,
        "Quiz scored"
    );

    Ok(QuizScoringResult {
        submission_id,
        quiz_id: request.quiz_id.clone(),
        score,
        raw_score: round1(raw_total),
        max_score,
        threshold,
        passed: score >= threshold,
        correct_count,
        question_results,
        degraded,
    })
}

/// Awarded points as a percentage of the available points
pub fn percentage(awarded: f64, available: f64) -> f64 {
    if available <= 0.0 {
        return 0.0;
    }
    round1(clamp_score(awarded / available * 100.0))
}

/// Full points for a correct answer, zero otherwise (trimmed, case-insensitive)
pub fn score_single_choice(question: &QuizQuestion, answer: &str, points: f64) -> QuestionResult {
    let correct = question
        .correct_answer
        .as_deref()
        .map(|expected| expected.trim().to_lowercase() == answer.trim().to_lowercase())
        .unwrap_or(false);

    QuestionResult {
        question_id: question.id.clone(),
        kind: QuestionKind::SingleChoice,
        correct: Some(correct),
        awarded: if correct { points } else { 0.0 },
        max_points: points,
        feedback: None,
        source: ScoreSource::Local,
    }
}

fn open_ended_points(question: &QuizQuestion, settings: &ScoringSettings) -> f64 {
    question
        .points
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(settings.single_choice_points)
}

fn fallback_result(question: &QuizQuestion, answer: &str, max_points: f64) -> QuestionResult {
    let words = word_count(answer);
    QuestionResult {
        question_id: question.id.clone(),
        kind: QuestionKind::OpenEnded,
        correct: None,
        awarded: round1(fallback_score(words) / 100.0 * max_points),
        max_points,
        feedback: Some(fallback_feedback(words)),
        source: ScoreSource::Fallback,
    }
}

/// Question id → (score, feedback), or `None` when the model is unavailable
async fn score_open_ended<'a>(
    ai: &AiClient,
    settings: &ScoringSettings,
    skill: Option<&str>,
    open_ended: &[(usize, &'a QuizQuestion, &'a str)],
) -> Option<HashMap<String, (f64, String)>> {
    let items: Vec<OpenEndedItem<'_>> = open_ended
        .iter()
        .map(|(_, q, answer)| OpenEndedItem {
            question_id: &q.id,
            prompt: &q.prompt,
            guidance: q.guidance.as_deref(),
            max_points: open_ended_points(q, settings),
            answer,
        })
        .collect();
    let prompt = build_open_ended_prompt(skill, &items);

    match ai
        .call_structured::<OpenEndedScoring>(&ModelRequest::text(prompt), "scoring")
        .await
    {
        Ok(scoring) => Some(
            scoring
                .answers
                .into_iter()
                .map(|a| (a.question_id, (a.score, a.feedback)))
                .collect(),
        ),
        Err(e) => {
            warn!(error = %e, "Open-ended scoring unavailable; using word-count fallback");
            None
        }
    }
}
