//! Model client tests against a mock `generateContent` server

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pwdjobs_ai::ai::{AiClient, AiError, GenerativeModelProvider, ModelProvider, ModelRequest};
use pwdjobs_ai::models::Roadmap;

const PRIMARY_PATH: &str = "/v1beta/models/primary-model:generateContent";
const FALLBACK_PATH: &str = "/v1beta/models/fallback-model:generateContent";

fn provider(server: &MockServer, model: &str, key: Option<&str>) -> Arc<GenerativeModelProvider> {
    Arc::new(
        GenerativeModelProvider::new(
            &format!("{}/v1beta", server.uri()),
            model,
            key.map(str::to_string),
            0.2,
            512,
            Duration::from_secs(2),
        )
        .unwrap(),
    )
}

fn client(server: &MockServer) -> AiClient {
    AiClient::new(
        provider(server, "primary-model", Some("test-key")),
        provider(server, "fallback-model", Some("test-key")),
    )
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

const ROADMAP_REPLY: &str = r#"```json
{"roadmap": {"title": "Plan", "total_weeks": 4, "milestones": [{"title": "Start", "start_week": 1, "end_week": 4}]}}
```"#;

#[tokio::test]
async fn test_provider_sends_prompt_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Hello model" }] }],
            "generationConfig": { "maxOutputTokens": 512 }
        })))
        .respond_with(reply("{\"ok\": true}"))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider(&server, "primary-model", Some("test-key"))
        .generate(&ModelRequest::text("Hello model"))
        .await
        .unwrap();

    assert_eq!(text, "{\"ok\": true}");
}

#[tokio::test]
async fn test_provider_maps_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = provider(&server, "primary-model", Some("test-key"))
        .generate(&ModelRequest::text("hi"))
        .await
        .unwrap_err();

    match err {
        AiError::Api(status, body) => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_provider_empty_candidates_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = provider(&server, "primary-model", Some("test-key"))
        .generate(&ModelRequest::text("hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::EmptyResponse));
}

#[tokio::test]
async fn test_primary_server_error_falls_back_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(FALLBACK_PATH))
        .respond_with(reply(ROADMAP_REPLY))
        .expect(1)
        .mount(&server)
        .await;

    let roadmap: Roadmap = client(&server)
        .call_structured(&ModelRequest::text("plan"), "roadmap")
        .await
        .unwrap();

    assert_eq!(roadmap.title, "Plan");
    assert_eq!(roadmap.milestones.len(), 1);
}

#[tokio::test]
async fn test_primary_missing_key_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(reply("{\"something_else\": {}}"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(FALLBACK_PATH))
        .respond_with(reply(ROADMAP_REPLY))
        .expect(1)
        .mount(&server)
        .await;

    let roadmap: Roadmap = client(&server)
        .call_structured(&ModelRequest::text("plan"), "roadmap")
        .await
        .unwrap();
    assert_eq!(roadmap.total_weeks, 4);
}

#[tokio::test]
async fn test_both_fail_reports_each_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(FALLBACK_PATH))
        .respond_with(reply("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .call_structured::<Roadmap>(&ModelRequest::text("plan"), "roadmap")
        .await
        .unwrap_err();

    match err {
        AiError::ModelUnavailable { primary, fallback } => {
            assert!(primary.contains("503"));
            assert!(fallback.contains("unparseable"));
        }
        other => panic!("expected ModelUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unconfigured_key_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply(ROADMAP_REPLY))
        .expect(0)
        .mount(&server)
        .await;

    let ai = AiClient::new(
        provider(&server, "primary-model", None),
        provider(&server, "fallback-model", None),
    );
    let err = ai.call("plan").await.unwrap_err();

    assert!(matches!(err, AiError::ModelUnavailable { .. }));
}
