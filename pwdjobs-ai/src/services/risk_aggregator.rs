//! Risk aggregation over verification signals
//!
//! The tier comes from the document examiner model's own
//! `overall_suspicion_level`. Local code adds context and applies a few floors:
//!
//! - failed liveness, failed face match or a claimed/extracted field mismatch
//!   raise the tier to at least MEDIUM
//! - a registry match lowers the score by 10 but never changes the tier, and
//!   never takes an escalated score back below its floor
//! - a registry miss or outage adds an "inconclusive" note and nothing else

use crate::models::{DocumentForensics, LivenessAnalysis};
use crate::services::registry_client::{RegistryCheck, RegistryOutcome};
use crate::types::{clamp_score, round1, RiskAssessment, RiskTier, SignalKind, Verdict, VerificationSignal};
use crate::verification::consistency::FieldConsistency;

/// Score reduction for a positive registry match
const REGISTRY_MATCH_CREDIT: f64 = 10.0;

/// Everything the aggregator may see; absent checks are simply skipped
#[derive(Default)]
pub struct RiskInputs<'a> {
    pub forensics: Option<&'a DocumentForensics>,
    pub consistency: Option<&'a FieldConsistency>,
    pub liveness: Option<&'a LivenessAnalysis>,
    pub registry: Option<&'a RegistryCheck>,
}

struct Accumulator {
    tier: RiskTier,
    score: f64,
    /// Lowest score any escalation so far allows
    floor: f64,
    reasons: Vec<String>,
    signals: Vec<VerificationSignal>,
}

impl Accumulator {
    /// Raise to at least `floor`, pulling the score up to the floor's midpoint
    fn escalate(&mut self, floor: RiskTier) {
        if self.tier < floor {
            self.tier = floor;
        }
        self.floor = self.floor.max(floor.midpoint());
        self.score = self.score.max(self.floor);
    }
}

/// Combine verification signals into a tier and score
pub fn aggregate(inputs: RiskInputs<'_>) -> RiskAssessment {
    let mut acc = Accumulator {
        tier: RiskTier::Low,
        score: RiskTier::Low.midpoint(),
        floor: 0.0,
        reasons: Vec::new(),
        signals: Vec::new(),
    };

    if let Some(forensics) = inputs.forensics {
        apply_forensics(&mut acc, forensics);
    }
    if let Some(consistency) = inputs.consistency {
        apply_consistency(&mut acc, consistency);
    }
    if let Some(liveness) = inputs.liveness {
        apply_liveness(&mut acc, liveness);
    }
    if let Some(registry) = inputs.registry {
        apply_registry(&mut acc, registry);
    }

    RiskAssessment {
        tier: acc.tier,
        score: round1(clamp_score(acc.score)),
        reasons: acc.reasons,
        signals: acc.signals,
    }
}

fn apply_forensics(acc: &mut Accumulator, forensics: &DocumentForensics) {
    let tier = forensics.suspicion_tier();
    acc.tier = tier;
    acc.score = forensics
        .suspicion_score
        .filter(|s| s.is_finite())
        .map(clamp_score)
        .unwrap_or_else(|| tier.midpoint());

    acc.reasons
        .push(format!("Document examiner rated suspicion {}", tier.as_str()));
    acc.reasons.extend(
        forensics
            .forgery_indicators
            .iter()
            .map(|i| format!("Forgery indicator: {}", i)),
    );

    let verdict = match (forensics.is_authentic, tier) {
        (false, _) => Verdict::Fail,
        (true, RiskTier::Low) => Verdict::Pass,
        (true, _) => Verdict::Inconclusive,
    };
    acc.signals.push(VerificationSignal::new(
        SignalKind::DocumentForensics,
        verdict,
        forensics.confidence,
        forensics.forgery_indicators.clone(),
    ));
}

fn apply_consistency(acc: &mut Accumulator, consistency: &FieldConsistency) {
    let compared = [consistency.name_match, consistency.id_match, consistency.category_match]
        .iter()
        .any(Option::is_some);
    if !compared {
        return;
    }

    let flags = consistency.mismatch_flags();
    let verdict = if consistency.has_mismatch() {
        Verdict::Fail
    } else {
        Verdict::Pass
    };
    let confidence = consistency.name_similarity.map(|s| s * 100.0).unwrap_or(100.0);

    if verdict == Verdict::Fail {
        acc.reasons.push(format!(
            "Submitted details do not match the card ({})",
            flags.join(", ")
        ));
        acc.escalate(RiskTier::Medium);
    }

    acc.signals.push(VerificationSignal::new(
        SignalKind::FieldConsistency,
        verdict,
        confidence,
        flags,
    ));
}

fn apply_liveness(acc: &mut Accumulator, liveness: &LivenessAnalysis) {
    let live_verdict = if liveness.is_live_person {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    acc.signals.push(VerificationSignal::new(
        SignalKind::Liveness,
        live_verdict,
        liveness.liveness_confidence,
        liveness.spoofing_indicators.clone(),
    ));
    if !liveness.is_live_person {
        acc.reasons
            .push("Selfie did not pass the liveness check".to_string());
        acc.escalate(RiskTier::Medium);
    }

    if let Some(face_match) = liveness.face_match {
        let verdict = if face_match { Verdict::Pass } else { Verdict::Fail };
        acc.signals.push(VerificationSignal::new(
            SignalKind::FaceMatch,
            verdict,
            liveness.face_match_confidence.unwrap_or(0.0),
            Vec::new(),
        ));
        if !face_match {
            acc.reasons
                .push("Selfie does not match the ID photo".to_string());
            acc.escalate(RiskTier::Medium);
        }
    }
}

fn apply_registry(acc: &mut Accumulator, registry: &RegistryCheck) {
    if registry.outcome.is_conclusive() {
        acc.score = (acc.score - REGISTRY_MATCH_CREDIT).max(acc.floor);
        acc.reasons
            .push("PWD ID corroborated by the government registry".to_string());
        acc.signals.push(VerificationSignal::new(
            SignalKind::Registry,
            Verdict::Pass,
            100.0,
            Vec::new(),
        ));
        return;
    }

    acc.reasons.push(format!(
        "Registry check inconclusive ({})",
        registry.outcome.as_str()
    ));
    acc.signals.push(VerificationSignal::new(
        SignalKind::Registry,
        Verdict::Inconclusive,
        0.0,
        vec![registry.outcome.as_str().to_string()],
    ));
}
