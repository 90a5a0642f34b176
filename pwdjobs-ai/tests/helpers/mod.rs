//! Test Helper Utilities
//!
//! Shared utilities for testing pwdjobs-ai

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

use pwdjobs_ai::ai::{AiClient, AiError, ModelProvider, ModelRequest};
use pwdjobs_ai::services::{LogSink, RegistryClient, SyncQueue};
use pwdjobs_ai::AppState;

/// Provider replying from a script, one entry per call, and counting calls
///
/// When the script runs out the last entry repeats. `None` entries fail.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Some(text)])
    }

    pub fn failing() -> Arc<Self> {
        Self::new(vec![None])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, AiError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let replies = self.replies.lock().unwrap();
        let reply = replies.get(n).or_else(|| replies.last()).cloned().flatten();
        reply.ok_or_else(|| AiError::Network("connection refused".into()))
    }
}

/// In-memory database with the production schema
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    pwdjobs_ai::db::init_tables(&pool)
        .await
        .expect("Failed to initialize database schema");
    pool
}

/// Registry client pointed at a closed local port
pub fn unreachable_registry() -> RegistryClient {
    RegistryClient::new("http://127.0.0.1:9/registry", Duration::from_secs(1)).unwrap()
}

/// Test app wiring
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

/// Build a test app from the given providers and registry
pub async fn create_test_app_with(
    primary: Arc<ScriptedProvider>,
    fallback: Arc<ScriptedProvider>,
    registry: RegistryClient,
) -> TestApp {
    let pool = create_test_db().await;
    create_test_app_on(pool, primary, fallback, registry)
}

/// Build a test app on an existing pool
pub fn create_test_app_on(
    pool: SqlitePool,
    primary: Arc<ScriptedProvider>,
    fallback: Arc<ScriptedProvider>,
    registry: RegistryClient,
) -> TestApp {
    let ai = AiClient::new(primary, fallback);
    let sync = SyncQueue::spawn(Arc::new(LogSink), 16);
    let state = AppState::new(pool.clone(), ai, registry, sync);
    TestApp {
        router: pwdjobs_ai::build_router(state.clone()),
        pool,
        state,
    }
}

/// POST a JSON body and return status plus parsed JSON response
pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
}

/// GET a path and return status plus parsed JSON response
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Base64 of a byte string `infer` recognizes as PNG
pub fn png_base64() -> String {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 64]);
    STANDARD.encode(bytes)
}

/// Base64 of a byte string `infer` recognizes as JPEG
pub fn jpeg_base64() -> String {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(&[0u8; 64]);
    STANDARD.encode(bytes)
}

/// A text of exactly `n` words
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}
