//! PWD ID document verification pipeline
//!
//! 1. Local input checks (images, category, ID number)
//! 2. Model forensics on the card images
//! 3. Claimed vs extracted field comparison
//! 4. Registry corroboration
//! 5. Liveness / face match when a selfie is supplied
//! 6. Risk aggregation, persistence and sync
//!
//! A model failure in step 2 or 5 fails the request; there is no local
//! forensic fallback.

use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::ModelRequest;
use crate::db::results::mark_verification;
use crate::error::{ApiError, ApiResult};
use crate::models::{DocumentForensics, DocumentVerificationRequest, DocumentVerificationResult, VerificationStatus};
use crate::prompts::verification::build_document_forensics_prompt;
use crate::scoring::{enqueue_sync, persist_best_effort};
use crate::services::risk_aggregator::{aggregate, RiskInputs};
use crate::validators::disability_category::validate_category;
use crate::validators::id_number::normalize_id_number;
use crate::validators::image_input::{check_image, check_optional_image};
use crate::verification::consistency::compare_fields;
use crate::verification::liveness::analyze_liveness;
use crate::AppState;

/// POST /api/verification/document
pub async fn verify_document(
    state: &AppState,
    request: DocumentVerificationRequest,
) -> ApiResult<DocumentVerificationResult> {
    let max_bytes = state.verification.max_image_bytes;

    // Step 1: local checks, before any network call
    let front = check_image("front_image", request.front_image.as_deref(), max_bytes).map_err(ApiError::invalid)?;
    let back =
        check_optional_image("back_image", request.back_image.as_deref(), max_bytes).map_err(ApiError::invalid)?;
    let selfie = check_optional_image("selfie", request.selfie.as_deref(), max_bytes).map_err(ApiError::invalid)?;

    let category = match non_blank(request.disability_category.as_deref()) {
        Some(raw) => {
            let validation = validate_category(raw);
            if !validation.valid {
                return Err(ApiError::invalid(validation.reason));
            }
            Some(validation)
        }
        None => None,
    };

    let claimed_id = match non_blank(request.id_number.as_deref()) {
        Some(raw) => Some(normalize_id_number(raw).map_err(ApiError::invalid)?),
        None => None,
    };

    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);
    let document_digest = front.sha256_hex();

    // Step 2: forensics
    let mut images = vec![front.to_inline()];
    if let Some(back) = &back {
        images.push(back.to_inline());
    }
    let prompt = build_document_forensics_prompt(
        back.is_some(),
        request.full_name.as_deref(),
        claimed_id.as_deref(),
    );
    let forensics: DocumentForensics = state
        .ai
        .call_structured(&ModelRequest::with_images(prompt, images), "analysis")
        .await?;

    // Step 3: consistency
    let consistency = compare_fields(
        request.full_name.as_deref(),
        claimed_id.as_deref(),
        category.as_ref().and_then(|c| c.matched_category.as_deref()),
        &forensics.extracted,
        state.verification.name_match_threshold,
    );

    // Step 4: registry, with the claimed ID or else the one read off the card
    let lookup_id = claimed_id.clone().or_else(|| {
        forensics
            .extracted
            .id_number
            .as_deref()
            .and_then(|id| normalize_id_number(id).ok())
    });
    let registry = match lookup_id {
        Some(id) => Some(state.registry.check(&id).await),
        None => None,
    };

    // Step 5: liveness against the card's front, where the ID photo is printed
    let liveness = match &selfie {
        Some(selfie) => Some(analyze_liveness(&state.ai, selfie, Some(&front)).await?),
        None => None,
    };

    // Step 6
    let risk = aggregate(RiskInputs {
        forensics: Some(&forensics),
        consistency: Some(&consistency),
        liveness: liveness.as_ref(),
        registry: registry.as_ref(),
    });
    let status = VerificationStatus::from(risk.tier);

    let result = DocumentVerificationResult {
        submission_id,
        status,
        risk,
        extracted: forensics.extracted.clone(),
        category,
        registry,
        document_digest,
    };

    if status != VerificationStatus::Verified {
        warn!(
            %submission_id,
            tier = result.risk.tier.as_str(),
            reasons = ?result.risk.reasons,
            "Document needs review"
        );
    }
    info!(
        %submission_id,
        status = status.as_str(),
        score = result.risk.score,
        "Document verification complete"
    );

    persist_best_effort(
        state,
        "verification",
        mark_verification(&state.db, request.user_id.as_deref(), &result),
    )
    .await;
    enqueue_sync(state, "verification", request.user_id.clone(), submission_id, &result);

    Ok(result)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
