//! Quiz scoring endpoint

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use super::{parse_body, Success};
use crate::models::{QuizScoringRequest, QuizScoringResult};
use crate::scoring::quiz::score_quiz;
use crate::{ApiResult, AppState};

/// POST /api/quiz/score
///
/// **Request:** `{"questions": [...], "answers": {"q1": "B", ...}}`
/// **Response:** `{"success": true, "score": ..., "passed": ..., ...}`
///
/// Missing or empty `answers` is a 400 and no model call is made.
pub async fn score_quiz_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuizScoringRequest>, JsonRejection>,
) -> ApiResult<Json<Success<QuizScoringResult>>> {
    let request = parse_body(payload)?;
    let result = score_quiz(&state, request).await?;
    Ok(Success::new(result))
}

/// Build quiz routes
pub fn quiz_routes() -> Router<AppState> {
    Router::new().route("/api/quiz/score", post(score_quiz_handler))
}
