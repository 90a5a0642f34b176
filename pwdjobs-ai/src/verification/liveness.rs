//! Selfie liveness and face match

use tracing::info;

use crate::ai::{AiClient, AiError, ModelRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::{LivenessAnalysis, LivenessRequest, LivenessResult};
use crate::prompts::verification::build_liveness_prompt;
use crate::services::risk_aggregator::{aggregate, RiskInputs};
use crate::validators::image_input::{check_image, check_optional_image, CheckedImage};
use crate::AppState;

/// POST /api/verification/liveness
pub async fn check_liveness(state: &AppState, request: LivenessRequest) -> ApiResult<LivenessResult> {
    let max_bytes = state.verification.max_image_bytes;
    let selfie = check_image("selfie", request.selfie.as_deref(), max_bytes).map_err(ApiError::invalid)?;
    let id_photo =
        check_optional_image("id_photo", request.id_photo.as_deref(), max_bytes).map_err(ApiError::invalid)?;

    let analysis = analyze_liveness(&state.ai, &selfie, id_photo.as_ref()).await?;
    let risk = aggregate(RiskInputs {
        liveness: Some(&analysis),
        ..Default::default()
    });

    info!(
        user_id = request.user_id.as_deref().unwrap_or("-"),
        live = analysis.is_live_person,
        face_match = ?analysis.face_match,
        tier = risk.tier.as_str(),
        "Liveness checked"
    );

    Ok(LivenessResult {
        is_live_person: analysis.is_live_person,
        liveness_confidence: analysis.liveness_confidence,
        face_match: analysis.face_match,
        face_match_confidence: analysis.face_match_confidence,
        spoofing_indicators: analysis.spoofing_indicators,
        risk,
    })
}

/// Ask the model about a selfie, optionally against an ID photo
///
/// Without an ID photo any face-match answer is discarded.
pub async fn analyze_liveness(
    ai: &AiClient,
    selfie: &CheckedImage,
    id_photo: Option<&CheckedImage>,
) -> Result<LivenessAnalysis, AiError> {
    let mut images = vec![selfie.to_inline()];
    if let Some(photo) = id_photo {
        images.push(photo.to_inline());
    }
    let request = ModelRequest::with_images(build_liveness_prompt(id_photo.is_some()), images);

    let mut analysis: LivenessAnalysis = ai.call_structured(&request, "analysis").await?;
    if id_photo.is_none() {
        analysis.face_match = None;
        analysis.face_match_confidence = None;
    }
    Ok(analysis)
}
