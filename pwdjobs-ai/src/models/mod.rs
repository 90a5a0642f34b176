//! Request, response and model-output types per endpoint

pub mod assessment;
pub mod challenge;
pub mod quiz;
pub mod verification;

pub use assessment::{Roadmap, RoadmapRequest, RoadmapResult, SkillGapAnalysis, SkillGapRequest, SkillGapResult};
pub use challenge::{Challenge, ChallengeScoring, ChallengeScoringRequest, ChallengeScoringResult, RubricCriterion};
pub use quiz::{QuestionKind, QuizQuestion, QuizScoringRequest, QuizScoringResult};
pub use verification::{
    DocumentForensics, DocumentVerificationRequest, DocumentVerificationResult, ExtractedFields,
    LivenessAnalysis, LivenessRequest, LivenessResult, VerificationStatus,
};
