//! Identity verification payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ModelOutput;
use crate::types::{RiskAssessment, RiskTier};
use crate::validators::disability_category::CategoryValidation;

/// POST /api/verification/category body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryCheckRequest {
    pub category: Option<String>,
}

/// POST /api/verification/registry body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryCheckRequest {
    pub id_number: Option<String>,
}

/// POST /api/verification/liveness body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LivenessRequest {
    pub user_id: Option<String>,
    /// Base64 selfie (a `data:` URL prefix is accepted)
    pub selfie: Option<String>,
    /// Base64 photo cropped from the ID, for face matching
    pub id_photo: Option<String>,
}

/// POST /api/verification/document body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentVerificationRequest {
    pub submission_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub id_number: Option<String>,
    pub disability_category: Option<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub selfie: Option<String>,
}

/// Fields read off the document by the model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    pub full_name: Option<String>,
    pub id_number: Option<String>,
    pub disability_category: Option<String>,
    pub expiry_date: Option<String>,
}

/// Model output under `analysis` for the document forensics call
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentForensics {
    pub is_authentic: bool,
    /// 0-100
    pub confidence: f64,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub forgery_indicators: Vec<String>,
    pub overall_suspicion_level: String,
    #[serde(default)]
    pub suspicion_score: Option<f64>,
    #[serde(default)]
    pub extracted: ExtractedFields,
}

impl DocumentForensics {
    pub fn suspicion_tier(&self) -> RiskTier {
        // validate() has already rejected unparseable levels
        RiskTier::parse_lenient(&self.overall_suspicion_level).unwrap_or(RiskTier::High)
    }
}

impl ModelOutput for DocumentForensics {
    fn validate(&self) -> Result<(), String> {
        if RiskTier::parse_lenient(&self.overall_suspicion_level).is_none() {
            return Err(format!(
                "unknown overall_suspicion_level `{}`",
                self.overall_suspicion_level
            ));
        }
        if !self.confidence.is_finite() {
            return Err("confidence is not a number".to_string());
        }
        Ok(())
    }
}

/// Model output under `analysis` for the liveness / face-match call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessAnalysis {
    pub is_live_person: bool,
    /// 0-100
    pub liveness_confidence: f64,
    #[serde(default)]
    pub face_match: Option<bool>,
    #[serde(default)]
    pub face_match_confidence: Option<f64>,
    #[serde(default)]
    pub spoofing_indicators: Vec<String>,
}

impl ModelOutput for LivenessAnalysis {
    fn validate(&self) -> Result<(), String> {
        if !self.liveness_confidence.is_finite() {
            return Err("liveness_confidence is not a number".to_string());
        }
        Ok(())
    }
}

/// Liveness endpoint result
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResult {
    pub is_live_person: bool,
    pub liveness_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_match_confidence: Option<f64>,
    pub spoofing_indicators: Vec<String>,
    pub risk: RiskAssessment,
}

/// Review status derived from the risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    PendingReview,
    Flagged,
}

impl From<RiskTier> for VerificationStatus {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => VerificationStatus::Verified,
            RiskTier::Medium => VerificationStatus::PendingReview,
            RiskTier::High => VerificationStatus::Flagged,
        }
    }
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::PendingReview => "pending_review",
            VerificationStatus::Flagged => "flagged",
        }
    }
}

/// Document verification result
#[derive(Debug, Clone, Serialize)]
pub struct DocumentVerificationResult {
    pub submission_id: Uuid,
    pub status: VerificationStatus,
    pub risk: RiskAssessment,
    pub extracted: ExtractedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<crate::services::registry_client::RegistryCheck>,
    /// SHA-256 of the decoded front image
    pub document_digest: String,
}
