//! End-to-end tests for the REST API, driven in-process through the router
//!
//! Tests cover:
//! - Profile create / fetch / overwrite / reset
//! - Malformed request bodies answered with a 400 JSON error
//! - Photo upload validation and mock verification
//! - Chat transcript bookkeeping with the canned-reply fallback
//! - Interests learned from chat
//! - Simulation runs and stored results

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use datecoach::chat::llm::OfflineClient;
use datecoach::config::Config;
use datecoach::routes;
use datecoach::state::AppState;

const BOUNDARY: &str = "datecoach-test-boundary";

// Helper to build an app with an isolated uploads directory
fn test_app() -> (TempDir, Router) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.path = Some(temp_dir.path().join("uploads"));
    config.simulation.step_delay_ms = 0;

    let state = AppState::new(config, Arc::new(OfflineClient));
    (temp_dir, routes::app(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_raw(app: &Router, uri: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Each file is (filename, content type, bytes).
async fn post_photos(app: &Router, files: &[(&str, &str, Vec<u8>)]) -> (StatusCode, Value) {
    // Unrelated fields are ignored by the handler
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n",
        BOUNDARY
    )
    .into_bytes();
    for (name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"photos\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/photos")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn profile_body(name: &str) -> Value {
    json!({
        "name": name,
        "ageRange": "25-34",
        "gender": "woman",
        "interestedIn": "men",
        "bio": "Weekend hiker and amateur baker looking for someone to share both with.",
        "relationshipGoal": "Long-term relationship",
        "textingTone": { "positivity": 75, "playfulness": 65 },
        "selfRating": 4
    })
}

async fn create_profile(app: &Router, name: &str) -> Value {
    let (status, body) = post_json(app, "/api/profile", profile_body(name)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    body
}

fn jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4]
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (_tmp, app) = test_app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// PROFILE
// ============================================================================

#[tokio::test]
async fn test_profile_not_found_before_onboarding() {
    let (_tmp, app) = test_app();
    let (status, body) = get(&app, "/api/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_then_get_returns_same_profile() {
    let (_tmp, app) = test_app();
    let created = create_profile(&app, "Maya").await;

    assert_eq!(created["welcomeMessage"]["sender"], "agent");
    assert_eq!(created["profile"]["textingTone"]["positivity"], 75);
    // responseLength was omitted and defaults to 50
    assert_eq!(created["profile"]["textingTone"]["responseLength"], 50);

    let (status, fetched) = get(&app, "/api/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created["profile"]);
}

#[tokio::test]
async fn test_second_profile_overwrites_first() {
    let (_tmp, app) = test_app();
    let first = create_profile(&app, "Maya").await;
    let second = create_profile(&app, "Nora").await;
    assert_ne!(first["profile"]["id"], second["profile"]["id"]);

    let (_, fetched) = get(&app, "/api/profile").await;
    assert_eq!(fetched["name"], "Nora");

    let (_, history) = get(&app, "/api/chat/history").await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_required_field_is_400() {
    let (_tmp, app) = test_app();
    let mut body = profile_body("Maya");
    body.as_object_mut().unwrap().remove("gender");

    let (status, body) = post_json(&app, "/api/profile", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("gender"));
}

#[tokio::test]
async fn test_profile_wrong_field_type_is_400_json() {
    let (_tmp, app) = test_app();
    let mut body = profile_body("Maya");
    body["name"] = json!(123);

    let (status, body) = post_json(&app, "/api/profile", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_profile_non_json_body_is_400_json() {
    let (_tmp, app) = test_app();
    let body = profile_body("Maya").to_string();

    let (status, response) = post_raw(&app, "/api/profile", "text/plain", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());

    let (status, response) = post_raw(&app, "/api/profile", "application/json", "{\"name\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());

    let (status, _) = get(&app, "/api/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_reports_completeness() {
    let (_tmp, app) = test_app();
    let created = create_profile(&app, "Maya").await;
    // base + full bio + self-rating
    assert_eq!(created["profile"]["completeness"], json!(0.55));
    assert_eq!(created["profile"]["interests"], json!([]));

    post_photos(&app, &[("me.jpg", "image/jpeg", jpeg())]).await;
    let (_, profile) = get(&app, "/api/profile").await;
    assert!(profile["completeness"].as_f64().unwrap() > 0.55);
}

#[tokio::test]
async fn test_delete_profile_resets_everything() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/profile")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, "/api/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, history) = get(&app, "/api/chat/history").await;
    assert!(history.as_array().unwrap().is_empty());
}

// ============================================================================
// PHOTOS
// ============================================================================

#[tokio::test]
async fn test_upload_requires_profile() {
    let (_tmp, app) = test_app();
    let (status, _) = post_photos(&app, &[("me.jpg", "image/jpeg", jpeg())]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_zero_files_fails_verification() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, body) = post_photos(&app, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filenames"], json!([]));
    assert_eq!(body["verification"]["status"], "failed");
    assert_eq!(body["verification"]["confidence"], 0);
}

#[tokio::test]
async fn test_upload_single_photo_is_success_75() {
    let (tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, body) = post_photos(&app, &[("me.jpg", "image/jpeg", jpeg())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["status"], "success");
    assert_eq!(body["verification"]["confidence"], 75);

    let filename = body["filenames"][0].as_str().unwrap();
    assert!(filename.ends_with(".jpg"));
    assert!(tmp.path().join("uploads").join(filename).exists());

    let (_, profile) = get(&app, "/api/profile").await;
    assert_eq!(profile["photos"], json!([filename]));

    // Stored photos are served back
    let request = Request::builder()
        .uri(format!("/uploads/{}", filename))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_repeat_upload_verifies_each_batch() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    for _ in 0..2 {
        let (status, body) = post_photos(&app, &[("me.jpg", "image/jpeg", jpeg())]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verification"]["status"], "success");
        assert_eq!(body["verification"]["confidence"], 75);
    }

    // An empty upload still fails even though photos are stored
    let (status, body) = post_photos(&app, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["status"], "failed");
    assert_eq!(body["verification"]["confidence"], 0);

    // The verification endpoint covers every stored photo
    let (status, verification) = get(&app, "/api/photos/verification").await;
    assert_eq!(status, StatusCode::OK);
    assert!((80..95).contains(&verification["confidence"].as_u64().unwrap()));
}

#[tokio::test]
async fn test_multiple_photos_use_thresholds() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let files = [
        ("a.jpg", "image/jpeg", jpeg()),
        ("b.png", "image/png", vec![0x89, b'P', b'N', b'G']),
    ];
    let (status, body) = post_photos(&app, &files).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filenames"].as_array().unwrap().len(), 2);

    for _ in 0..10 {
        let (status, verification) = get(&app, "/api/photos/verification").await;
        assert_eq!(status, StatusCode::OK);
        let confidence = verification["confidence"].as_u64().unwrap();
        assert!((80..95).contains(&confidence));
        let expected = if confidence >= 85 { "success" } else { "inconclusive" };
        assert_eq!(verification["status"], expected);
    }
}

#[tokio::test]
async fn test_upload_rejects_wrong_type_and_too_many_files() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, _) = post_photos(&app, &[("me.gif", "image/gif", vec![1, 2, 3])]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let files: Vec<_> = (0..4)
        .map(|i| (["a.jpg", "b.jpg", "c.jpg", "d.jpg"][i], "image/jpeg", jpeg()))
        .collect();
    let (status, _) = post_photos(&app, &files).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored by the rejected requests
    let (_, profile) = get(&app, "/api/profile").await;
    assert_eq!(profile["photos"], json!([]));
}

#[tokio::test]
async fn test_upload_rejects_oversized_photo() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let big = vec![0u8; 5 * 1024 * 1024 + 1];
    let (status, _) = post_photos(&app, &[("big.jpg", "image/jpeg", big)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_400_json() {
    let (tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let huge = vec![0u8; 16 * 1024 * 1024];
    let (status, body) = post_photos(&app, &[("huge.jpg", "image/jpeg", huge)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let uploads = tmp.path().join("uploads");
    assert!(!uploads.exists() || std::fs::read_dir(&uploads).unwrap().next().is_none());
}

#[tokio::test]
async fn test_upload_without_multipart_body_is_400_json() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, body) = post_raw(&app, "/api/photos", "application/json", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_verification_without_photos_is_404() {
    let (_tmp, app) = test_app();
    let (status, _) = get(&app, "/api/photos/verification").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create_profile(&app, "Maya").await;
    let (status, _) = get(&app, "/api/photos/verification").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// CHAT
// ============================================================================

#[tokio::test]
async fn test_history_grows_by_two_per_message() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let messages = ["hello there", "any tips for openers?", "I'm feeling nervous"];
    for content in messages {
        let (status, reply) = post_json(&app, "/api/chat/message", json!({ "content": content })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["sender"], "agent");
    }

    let (_, history) = get(&app, "/api/chat/history").await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1 + 2 * messages.len());
    for (i, content) in messages.iter().enumerate() {
        assert_eq!(history[1 + 2 * i]["sender"], "user");
        assert_eq!(history[1 + 2 * i]["content"], *content);
        assert_eq!(history[2 + 2 * i]["sender"], "agent");
    }
    // The offline client answers from the canned rules
    assert!(history[4]["content"].as_str().unwrap().starts_with("Quick tip"));
}

#[tokio::test]
async fn test_empty_message_is_400() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, _) = post_json(&app, "/api/chat/message", json!({ "content": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post_json(&app, "/api/chat/message", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_message_body_is_400_json() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, body) = post_json(&app, "/api/chat/message", json!({ "content": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = post_raw(&app, "/api/chat/message", "text/plain", "hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Rejected bodies never reach the transcript
    let (_, history) = get(&app, "/api/chat/history").await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_learns_interests() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let content = "I love hiking and I've been baking sourdough lately";
    post_json(&app, "/api/chat/message", json!({ "content": content })).await;
    post_json(&app, "/api/chat/message", json!({ "content": "more hiking this weekend" })).await;

    let (_, profile) = get(&app, "/api/profile").await;
    assert_eq!(profile["interests"], json!(["hiking", "cooking"]));
}

#[tokio::test]
async fn test_chat_requires_profile() {
    let (_tmp, app) = test_app();
    let (status, _) = post_json(&app, "/api/chat/message", json!({ "content": "hi" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// SIMULATIONS
// ============================================================================

#[tokio::test]
async fn test_results_not_found_before_run() {
    let (_tmp, app) = test_app();
    let (status, _) = get(&app, "/api/simulations/results").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&app, "/api/simulations/run", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_run_simulation_stores_summary() {
    let (_tmp, app) = test_app();
    create_profile(&app, "Maya").await;

    let (status, body) = post_json(&app, "/api/simulations/run", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let summary = &body["summary"];
    assert_eq!(summary["totalSimulations"], 50);
    let average = summary["averageCompatibility"].as_u64().unwrap();
    assert!((60..95).contains(&average));
    assert_eq!(summary["topArchetypes"].as_array().unwrap().len(), 5);
    assert!(summary["commonIssues"].as_array().unwrap().len() <= 3);
    assert!(summary["coachingTips"].as_array().unwrap().len() <= 5);
    assert_eq!(summary["suggestedOpeners"].as_array().unwrap().len(), 5);
    assert_eq!(body["chatMessage"]["sender"], "agent");

    let (status, stored) = get(&app, "/api/simulations/results").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&stored, summary);

    // The formatted summary is posted to the chat
    let (_, history) = get(&app, "/api/chat/history").await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1], body["chatMessage"]);
}
