//! pwdjobs-ai library interface
//!
//! Exposes the router and its building blocks for the binary and for
//! integration tests.

pub mod ai;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod services;
pub mod types;
pub mod validators;
pub mod verification;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use pwdjobs_common::config::VerificationConfig;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::ai::AiClient;
use crate::config::ScoringSettings;
use crate::services::{RegistryClient, SyncQueue};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Primary → fallback model client
    pub ai: AiClient,
    /// Government PWD registry
    pub registry: Arc<RegistryClient>,
    /// Workspace sync queue
    pub sync: SyncQueue,
    /// Thresholds and points in effect
    pub scoring: ScoringSettings,
    /// Image limits and name matching
    pub verification: VerificationConfig,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, ai: AiClient, registry: RegistryClient, sync: SyncQueue) -> Self {
        Self {
            db,
            ai,
            registry: Arc::new(registry),
            sync,
            scoring: ScoringSettings::default(),
            verification: VerificationConfig::default(),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringSettings) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_verification(mut self, verification: VerificationConfig) -> Self {
        self.verification = verification;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    // Up to three base64 images per request; base64 inflates by 4/3
    let body_limit = state
        .verification
        .max_image_bytes
        .saturating_mul(4)
        .saturating_add(1024 * 1024);

    Router::new()
        .merge(api::health_routes())
        .merge(api::assessment_routes())
        .merge(api::quiz_routes())
        .merge(api::challenge_routes())
        .merge(api::verification_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
