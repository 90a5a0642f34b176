//! Integration tests for pwdjobs-ai API endpoints
//!
//! Drive the router with `oneshot`; model providers are scripted and the
//! registry points at a closed port unless a test mocks it.

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{
    create_test_app_on, create_test_app_with, get_json, png_base64, post_json, send, unreachable_registry, words,
    ScriptedProvider,
};
use pwdjobs_ai::services::RegistryClient;

const FORENSICS_LOW: &str = r#"{"analysis": {
    "is_authentic": true,
    "confidence": 92,
    "document_type": "PWD ID",
    "forgery_indicators": [],
    "overall_suspicion_level": "LOW",
    "suspicion_score": 12,
    "extracted": {
        "full_name": "JUAN DELA CRUZ",
        "id_number": "13-7602-000-0001234",
        "disability_category": "Visual Disability",
        "expiry_date": null
    }
}}"#;

fn quiz_body() -> serde_json::Value {
    json!({
        "user_id": "u-100",
        "quiz_id": "excel-basics",
        "questions": [
            {"id": "q1", "type": "single_choice", "prompt": "Sum function?", "correct_answer": "SUM"},
            {"id": "q2", "type": "single_choice", "prompt": "Lookup function?", "correct_answer": "VLOOKUP"},
            {"id": "q3", "type": "single_choice", "prompt": "Count function?", "correct_answer": "COUNT"},
            {"id": "q4", "type": "open_ended", "prompt": "Explain a pivot table", "points": 40}
        ],
        "answers": {"q1": "sum", "q2": " VLOOKUP ", "q3": "COUNTA", "q4": words(120)}
    })
}

fn challenge_body(submission: &str) -> serde_json::Value {
    json!({
        "user_id": "u-100",
        "challenge": {
            "id": "c-7",
            "title": "Write a product description",
            "description": "Describe a handmade bag for an online shop",
            "rubric": [
                {"criterion": "Accuracy", "max_points": 50},
                {"criterion": "Persuasiveness", "max_points": 50}
            ]
        },
        "submission": submission
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "pwdjobs-ai");
    assert_eq!(json["sync_failures"], 0);
    assert!(json["uptime_seconds"].is_u64());
}

// ============================================================================
// Quiz
// ============================================================================

#[tokio::test]
async fn test_quiz_missing_answers_is_400_without_model_call() {
    let primary = ScriptedProvider::failing();
    let fallback = ScriptedProvider::failing();
    let app = create_test_app_with(primary.clone(), fallback.clone(), unreachable_registry()).await;

    let mut body = quiz_body();
    body.as_object_mut().unwrap().remove("answers");
    let (status, json) = post_json(&app.router, "/api/quiz/score", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("answers"));

    body["answers"] = json!({});
    let (status, _) = post_json(&app.router, "/api/quiz/score", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(primary.calls() + fallback.calls(), 0);
}

#[tokio::test]
async fn test_quiz_scored_with_model_and_persisted() {
    let primary = ScriptedProvider::replying(
        r#"```json
{"scoring": {"answers": [{"question_id": "q4", "score": 32, "feedback": "Clear explanation"}]}}
```"#,
    );
    let app = create_test_app_with(primary.clone(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/quiz/score", &quiz_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    // q1 + q2 correct (20 each), q3 wrong, q4 32 of 40; 100 points available
    assert_eq!(json["score"], 72.0);
    assert_eq!(json["raw_score"], 72.0);
    assert_eq!(json["max_score"], 100.0);
    assert_eq!(json["passed"], true);
    assert_eq!(json["correct_count"], 2);
    assert_eq!(json["degraded"], false);
    assert_eq!(primary.calls(), 1);
    assert!(primary.prompts()[0].contains("question_id: \"q4\""));

    let (score, passed): (f64, bool) = sqlx::query_as("SELECT score, passed FROM quiz_results")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(score, 72.0);
    assert!(passed);
}

#[tokio::test]
async fn test_quiz_both_models_failing_still_scores() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/quiz/score", &quiz_body()).await;

    assert_eq!(status, StatusCode::OK);
    // 40 local + 62% of 40 for a 120-word answer
    assert_eq!(json["score"], 64.8);
    assert_eq!(json["degraded"], true);
    assert_eq!(json["question_results"][3]["source"], "fallback");
}

// ============================================================================
// Challenge
// ============================================================================

#[tokio::test]
async fn test_challenge_missing_fields_is_400_without_model_call() {
    let primary = ScriptedProvider::failing();
    let app = create_test_app_with(primary.clone(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/challenge/score", &json!({"submission": "text"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: challenge");

    let (status, json) = post_json(&app.router, "/api/challenge/score", &challenge_body("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: submission");

    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn test_challenge_250_words_without_model_scores_72() {
    let primary = ScriptedProvider::failing();
    let fallback = ScriptedProvider::failing();
    let app = create_test_app_with(primary.clone(), fallback.clone(), unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/challenge/score", &challenge_body(&words(250))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["score"], 72.0);
    assert_eq!(json["threshold"], 70.0);
    assert_eq!(json["passed"], true);
    assert_eq!(json["degraded"], true);
    assert_eq!(json["word_count"], 250);
    // One attempt per provider, no retries
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test]
async fn test_challenge_primary_fails_fallback_scores() {
    let fallback = ScriptedProvider::replying(
        r#"{"scoring": {
            "rubric_scores": [
                {"criterion": "Accuracy", "score": 40, "max_points": 50, "feedback": "Correct details"},
                {"criterion": "Persuasiveness", "score": 38, "max_points": 50, "feedback": "Good hook"}
            ],
            "final_score": 78,
            "feedback": "Solid description",
            "strengths": ["clear"],
            "improvements": ["add a call to action"]
        }}"#,
    );
    let app = create_test_app_with(ScriptedProvider::failing(), fallback, unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/challenge/score", &challenge_body("A sturdy woven bag.")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 78.0);
    assert_eq!(json["rubric_total"], 78.0);
    assert_eq!(json["source"], "model");
    assert_eq!(json["degraded"], false);
    assert_eq!(json["rubric_scores"][1]["criterion"], "Persuasiveness");
}

#[tokio::test]
async fn test_persistence_failure_does_not_affect_response() {
    // No tables: every write fails
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let app = create_test_app_on(pool, ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry());

    let (status, json) = post_json(&app.router, "/api/challenge/score", &challenge_body(&words(250))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 72.0);

    let (_, health) = get_json(&app.router, "/health").await;
    assert_eq!(health["status"], "degraded");
    assert!(health["last_error"].as_str().unwrap().contains("challenge_result"));
}

// ============================================================================
// Assessment
// ============================================================================

#[tokio::test]
async fn test_skill_gap_degrades_to_local_analysis() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({
        "target_role": "Data Encoder",
        "candidate_skills": ["excel", "typing"],
        "required_skills": ["Excel", "Typing", "Data Privacy", "SQL"]
    });
    let (status, json) = post_json(&app.router, "/api/assessment/skill-gap", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["match_percentage"], 50.0);
    assert_eq!(json["missing_skills"], json!(["Data Privacy", "SQL"]));
    assert_eq!(json["degraded"], true);
    assert_eq!(json["analysis"]["readiness_level"], "nearly_ready");
}

#[tokio::test]
async fn test_roadmap_model_unavailable_is_500() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({"target_role": "Virtual Assistant", "skill_gaps": ["Google Sheets"]});
    let (status, json) = post_json(&app.router, "/api/assessment/roadmap", &body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
    assert!(json["detail"].as_str().unwrap().contains("primary"));
}

#[tokio::test]
async fn test_roadmap_generated() {
    let primary = ScriptedProvider::replying(
        r#"{"roadmap": {"title": "VA in 8 weeks", "summary": "", "total_weeks": 8, "milestones": [
            {"title": "Sheets basics", "start_week": 1, "end_week": 4, "skills": ["Google Sheets"],
             "resources": [{"title": "Sheets training", "url": "https://example.org/sheets"}]},
            {"title": "Client work", "start_week": 5, "end_week": 8}
        ]}}"#,
    );
    let app = create_test_app_with(primary, ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({"target_role": "Virtual Assistant", "skill_gaps": ["Google Sheets"], "timeframe_weeks": 8});
    let (status, json) = post_json(&app.router, "/api/assessment/roadmap", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["roadmap"]["milestones"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_category_diagnosis_and_valid() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = post_json(&app.router, "/api/verification/category", &json!({"category": "Diabetes"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert_eq!(json["isMedicalDiagnosis"], true);
    assert!(json["suggestion"].is_string());

    let (status, json) =
        post_json(&app.router, "/api/verification/category", &json!({"category": "vIsUaL dIsAbIlItY"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["matchedCategory"], "Visual Disability");

    let (status, _) = post_json(&app.router, "/api/verification/category", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registry_unreachable_is_inconclusive() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) =
        post_json(&app.router, "/api/verification/registry", &json!({"id_number": " 13-7602-000-0001234 "})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "unreachable");
    assert_eq!(json["id_number"], "13-7602-000-0001234");
    let interpretation = json["interpretation"].as_str().unwrap().to_lowercase();
    assert!(interpretation.contains("inconclusive"));
    assert!(!interpretation.contains("fraud"));
}

#[tokio::test]
async fn test_registry_bad_id_is_400() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, _) = post_json(&app.router, "/api/verification/registry", &json!({"id_number": "13/7602"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app.router, "/api/verification/registry", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_missing_front_image_is_400_without_model_call() {
    let primary = ScriptedProvider::replying(FORENSICS_LOW);
    let app = create_test_app_with(primary.clone(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) =
        post_json(&app.router, "/api/verification/document", &json!({"full_name": "Juan Dela Cruz"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: front_image");

    let (status, json) = post_json(
        &app.router,
        "/api/verification/document",
        &json!({"front_image": png_base64(), "disability_category": "Diabetes"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("medical diagnosis"));

    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn test_document_verified_with_registry_unreachable() {
    let app = create_test_app_with(
        ScriptedProvider::replying(FORENSICS_LOW),
        ScriptedProvider::failing(),
        unreachable_registry(),
    )
    .await;

    let body = json!({
        "user_id": "u-100",
        "full_name": "Juan Dela Cruz",
        "id_number": "13-7602-000-0001234",
        "disability_category": "visual",
        "front_image": format!("data:image/png;base64,{}", png_base64())
    });
    let (status, json) = post_json(&app.router, "/api/verification/document", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "verified");
    assert_eq!(json["risk"]["tier"], "LOW");
    assert_eq!(json["risk"]["score"], 12.0);
    assert_eq!(json["registry"]["outcome"], "unreachable");
    assert_eq!(json["category"]["matchedCategory"], "Visual Disability");
    assert_eq!(json["document_digest"].as_str().unwrap().len(), 64);

    let (status, digest): (String, String) =
        sqlx::query_as("SELECT status, document_digest FROM verifications")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(status, "verified");
    assert_eq!(Some(digest.as_str()), json["document_digest"].as_str());
}

#[tokio::test]
async fn test_document_registry_found_lowers_score() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("id_number", "13-7602-000-0001234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": true})))
        .mount(&registry)
        .await;
    let client = RegistryClient::new(registry.uri(), Duration::from_secs(2)).unwrap();
    let app = create_test_app_with(ScriptedProvider::replying(FORENSICS_LOW), ScriptedProvider::failing(), client).await;

    // No claimed id: the id read off the card is looked up
    let body = json!({"full_name": "Juan Dela Cruz", "front_image": png_base64()});
    let (status, json) = post_json(&app.router, "/api/verification/document", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["registry"]["outcome"], "found");
    assert_eq!(json["risk"]["tier"], "LOW");
    assert_eq!(json["risk"]["score"], 2.0);
}

#[tokio::test]
async fn test_document_name_mismatch_and_failed_liveness_need_review() {
    let primary = ScriptedProvider::new(vec![
        Some(FORENSICS_LOW),
        Some(r#"{"analysis": {"is_live_person": false, "liveness_confidence": 85, "face_match": true, "face_match_confidence": 70, "spoofing_indicators": ["screen bezel visible"]}}"#),
    ]);
    let app = create_test_app_with(primary.clone(), ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({
        "full_name": "Maria Santos",
        "front_image": png_base64(),
        "selfie": helpers::jpeg_base64()
    });
    let (status, json) = post_json(&app.router, "/api/verification/document", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "pending_review");
    assert_eq!(json["risk"]["tier"], "MEDIUM");
    assert_eq!(json["risk"]["score"], 50.0);
    assert_eq!(primary.calls(), 2);
    let reasons = json["risk"]["reasons"].to_string();
    assert!(reasons.contains("name_mismatch"));
    assert!(reasons.contains("liveness"));
}

#[tokio::test]
async fn test_document_model_unavailable_is_500() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) =
        post_json(&app.router, "/api/verification/document", &json!({"front_image": png_base64()})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "AI model unavailable, please try again later");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let primary = ScriptedProvider::replying(
        r#"{"analysis": {"is_live_person": true, "liveness_confidence": 93, "face_match": true, "face_match_confidence": 88, "spoofing_indicators": []}}"#,
    );
    let app = create_test_app_with(primary, ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({"user_id": "u-1", "selfie": helpers::jpeg_base64(), "id_photo": png_base64()});
    let (status, json) = post_json(&app.router, "/api/verification/liveness", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_live_person"], true);
    assert_eq!(json["face_match"], true);
    assert_eq!(json["risk"]["tier"], "LOW");
}

#[tokio::test]
async fn test_liveness_rejects_non_image() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let body = json!({"selfie": "aGVsbG8gd29ybGQ="});
    let (status, json) = post_json(&app.router, "/api/verification/liveness", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("JPEG, PNG or WEBP"));
}

// ============================================================================
// Malformed input
// ============================================================================

#[tokio::test]
async fn test_malformed_json_is_400_with_error_body() {
    let app = create_test_app_with(ScriptedProvider::failing(), ScriptedProvider::failing(), unreachable_registry()).await;

    let (status, json) = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri("/api/quiz/score")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}
