//! Challenge scoring endpoint

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use super::{parse_body, Success};
use crate::models::{ChallengeScoringRequest, ChallengeScoringResult};
use crate::scoring::challenge::score_challenge;
use crate::{ApiResult, AppState};

/// POST /api/challenge/score
///
/// Always returns a score once the input is valid: when the model is
/// unavailable the word-count fallback is used and `degraded` is set.
pub async fn score_challenge_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChallengeScoringRequest>, JsonRejection>,
) -> ApiResult<Json<Success<ChallengeScoringResult>>> {
    let request = parse_body(payload)?;
    let result = score_challenge(&state, request).await?;
    Ok(Success::new(result))
}

/// Build challenge routes
pub fn challenge_routes() -> Router<AppState> {
    Router::new().route("/api/challenge/score", post(score_challenge_handler))
}
