//! Scoring and verification result persistence
//!
//! Idempotent upserts keyed by submission id. The full result is stored as
//! JSON in `detail`; a few columns are broken out for querying.

use chrono::Utc;
use serde::Serialize;
use sqlx::{Pool, Sqlite};
use pwdjobs_common::{Error, Result};

use crate::models::{ChallengeScoringResult, DocumentVerificationResult, QuizScoringResult, SkillGapResult};

fn to_detail<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Internal(format!("Serialize result failed: {}", e)))
}

/// Save a quiz result
pub async fn save_quiz_result(db: &Pool<Sqlite>, user_id: Option<&str>, result: &QuizScoringResult) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quiz_results (submission_id, user_id, quiz_id, score, passed, degraded, detail, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(submission_id) DO UPDATE SET
            user_id = excluded.user_id,
            quiz_id = excluded.quiz_id,
            score = excluded.score,
            passed = excluded.passed,
            degraded = excluded.degraded,
            detail = excluded.detail,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(result.submission_id.to_string())
    .bind(user_id)
    .bind(result.quiz_id.as_deref())
    .bind(result.score)
    .bind(result.passed)
    .bind(result.degraded)
    .bind(to_detail(result)?)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Save a challenge result
pub async fn save_challenge_result(
    db: &Pool<Sqlite>,
    user_id: Option<&str>,
    result: &ChallengeScoringResult,
) -> Result<()> {
    let source = serde_json::to_value(result.source)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    sqlx::query(
        r#"
        INSERT INTO challenge_results (submission_id, user_id, challenge_id, score, passed, source, detail, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(submission_id) DO UPDATE SET
            user_id = excluded.user_id,
            challenge_id = excluded.challenge_id,
            score = excluded.score,
            passed = excluded.passed,
            source = excluded.source,
            detail = excluded.detail,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(result.submission_id.to_string())
    .bind(user_id)
    .bind(result.challenge_id.as_deref())
    .bind(result.score)
    .bind(result.passed)
    .bind(source)
    .bind(to_detail(result)?)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Save a skill-gap assessment
pub async fn save_skill_assessment(db: &Pool<Sqlite>, user_id: Option<&str>, result: &SkillGapResult) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO skill_assessments (submission_id, user_id, target_role, match_percentage, detail, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(submission_id) DO UPDATE SET
            user_id = excluded.user_id,
            target_role = excluded.target_role,
            match_percentage = excluded.match_percentage,
            detail = excluded.detail,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(result.submission_id.to_string())
    .bind(user_id)
    .bind(&result.target_role)
    .bind(result.match_percentage)
    .bind(to_detail(result)?)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Record the outcome of a document verification
///
/// Only the image digest is stored, never the image.
pub async fn mark_verification(
    db: &Pool<Sqlite>,
    user_id: Option<&str>,
    result: &DocumentVerificationResult,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO verifications (submission_id, user_id, status, risk_tier, risk_score, document_digest, detail, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(submission_id) DO UPDATE SET
            user_id = excluded.user_id,
            status = excluded.status,
            risk_tier = excluded.risk_tier,
            risk_score = excluded.risk_score,
            document_digest = excluded.document_digest,
            detail = excluded.detail,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(result.submission_id.to_string())
    .bind(user_id)
    .bind(result.status.as_str())
    .bind(result.risk.tier.as_str())
    .bind(result.risk.score)
    .bind(&result.document_digest)
    .bind(to_detail(result)?)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
