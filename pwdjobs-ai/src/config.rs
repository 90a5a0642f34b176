//! Configuration resolution for pwdjobs-ai
//!
//! - model API key: ENV → TOML
//! - scoring settings: Database → TOML → built-in defaults

use pwdjobs_common::config::{ScoringConfig, TomlConfig};
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

use crate::db::settings::{
    get_setting, CHALLENGE_PASS_THRESHOLD_KEY, QUIZ_PASS_THRESHOLD_KEY, SINGLE_CHOICE_POINTS_KEY,
};

/// Environment variable holding the model API key
pub const AI_API_KEY_ENV_VAR: &str = "PWDJOBS_AI_API_KEY";

/// Resolve the model API key
///
/// **Priority:** ENV → TOML. `None` is not fatal: every model call then fails
/// over to the local fallbacks.
pub fn resolve_ai_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(AI_API_KEY_ENV_VAR).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config.ai.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Model API key found in both environment and TOML config. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Model API key loaded from environment variable");
        return Some(key);
    }
    if let Some(key) = toml_key {
        info!("Model API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "Model API key not configured (set {} or [ai] api_key); AI scoring will use local fallbacks",
        AI_API_KEY_ENV_VAR
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Scoring knobs in effect for this process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringSettings {
    pub quiz_pass_threshold: f64,
    pub challenge_pass_threshold: f64,
    pub single_choice_points: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self::from_toml(&ScoringConfig::default())
    }
}

impl ScoringSettings {
    /// Take the TOML values, replacing any out-of-range one with its default
    pub fn from_toml(config: &ScoringConfig) -> Self {
        let defaults = ScoringConfig::default();
        Self {
            quiz_pass_threshold: toml_value(
                "quiz_pass_threshold",
                config.quiz_pass_threshold,
                defaults.quiz_pass_threshold,
                is_threshold,
            ),
            challenge_pass_threshold: toml_value(
                "challenge_pass_threshold",
                config.challenge_pass_threshold,
                defaults.challenge_pass_threshold,
                is_threshold,
            ),
            single_choice_points: toml_value(
                "single_choice_points",
                config.single_choice_points,
                defaults.single_choice_points,
                is_points,
            ),
        }
    }

    /// Apply database overrides on top of the TOML values
    ///
    /// An unreadable or out-of-range database value is logged and skipped.
    pub async fn resolve(db: &Pool<Sqlite>, config: &ScoringConfig) -> Self {
        let mut settings = Self::from_toml(config);

        if let Some(v) = db_override(db, QUIZ_PASS_THRESHOLD_KEY, is_threshold).await {
            settings.quiz_pass_threshold = v;
        }
        if let Some(v) = db_override(db, CHALLENGE_PASS_THRESHOLD_KEY, is_threshold).await {
            settings.challenge_pass_threshold = v;
        }
        if let Some(v) = db_override(db, SINGLE_CHOICE_POINTS_KEY, is_points).await {
            settings.single_choice_points = v;
        }

        info!(
            quiz_pass_threshold = settings.quiz_pass_threshold,
            challenge_pass_threshold = settings.challenge_pass_threshold,
            single_choice_points = settings.single_choice_points,
            "Scoring settings resolved"
        );
        settings
    }
}

fn is_threshold(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

fn is_points(value: f64) -> bool {
    value > 0.0 && value <= 100.0
}

fn toml_value(key: &str, value: f64, default: f64, accept: fn(f64) -> bool) -> f64 {
    if value.is_finite() && accept(value) {
        value
    } else {
        warn!(key, value, default, "Ignoring out-of-range [scoring] value in TOML config");
        default
    }
}

async fn db_override(db: &Pool<Sqlite>, key: &str, accept: impl Fn(f64) -> bool) -> Option<f64> {
    match get_setting::<f64>(db, key).await {
        Ok(Some(v)) if v.is_finite() && accept(v) => {
            info!(key, value = v, "Scoring setting loaded from database");
            Some(v)
        }
        Ok(Some(v)) => {
            warn!(key, value = v, "Ignoring out-of-range scoring setting in database");
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read scoring setting from database");
            None
        }
    }
}
