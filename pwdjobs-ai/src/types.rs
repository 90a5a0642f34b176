//! Core types shared by the scoring and verification pipelines
//!
//! All of these are per-request values: created while handling one HTTP
//! request and dropped once the response is sent.

use serde::{Deserialize, Serialize};

// ============================================================================
// Scoring
// ============================================================================

/// One rubric criterion with the points awarded against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScore {
    pub criterion: String,
    /// Points awarded (0..=max_points)
    pub score: f64,
    pub max_points: f64,
    #[serde(default)]
    pub feedback: String,
}

/// Where a score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Deterministic local scoring only
    Local,
    /// Scored by the generative model
    Model,
    /// Word-count heuristic used because the model was unavailable
    Fallback,
}

/// Clamp a score into [0, 100]
///
/// NaN collapses to 0 so a malformed model number can never escape the range.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Round to one decimal place for presentation
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Verification
// ============================================================================

/// Kind of verification check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    DocumentForensics,
    FieldConsistency,
    Liveness,
    FaceMatch,
    Registry,
}

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    /// Neither supports nor contradicts the claim
    Inconclusive,
}

/// One forensic, liveness, consistency or registry outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSignal {
    pub kind: SignalKind,
    pub verdict: Verdict,
    /// Confidence 0-100
    pub confidence: u8,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl VerificationSignal {
    pub fn new(kind: SignalKind, verdict: Verdict, confidence: f64, flags: Vec<String>) -> Self {
        Self {
            kind,
            verdict,
            confidence: clamp_score(confidence).round() as u8,
            flags,
        }
    }
}

/// Risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    /// Score used when the model reports a tier without a number
    pub fn midpoint(self) -> f64 {
        match self {
            RiskTier::Low => 20.0,
            RiskTier::Medium => 50.0,
            RiskTier::High => 80.0,
        }
    }

    /// Parse the model's `overall_suspicion_level`, tolerating case and spacing
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(RiskTier::Low),
            "MEDIUM" | "MODERATE" => Some(RiskTier::Medium),
            "HIGH" => Some(RiskTier::High),
            _ => None,
        }
    }
}

/// Aggregated verdict over all verification signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// Risk score 0-100 (higher is riskier)
    pub score: f64,
    pub reasons: Vec<String>,
    pub signals: Vec<VerificationSignal>,
}
