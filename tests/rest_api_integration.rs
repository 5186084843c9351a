//! Integration tests for the demo session REST API
//!
//! These tests drive the full router in-process, so no port is bound:
//! - Sessions are created, advanced and reset over HTTP
//! - Invalid step references map to 400, unknown sessions to 404
//! - Two sessions never see each other's progress
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test rest_api_integration
//! ```

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use imaging_demo::config::Config;
use imaging_demo::rest::{build_router, ApiState};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn test_router() -> Router {
    let state = ApiState::new(Config::default()).expect("default config builds");
    build_router(state)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_session(router: &Router) -> String {
    let (status, body) = send(router, Method::POST, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn session_path(id: &str, action: &str) -> String {
    if action.is_empty() {
        format!("/api/v1/sessions/{}", id)
    } else {
        format!("/api/v1/sessions/{}/{}", id, action)
    }
}

fn completed(body: &Value) -> Vec<u64> {
    body["completed_step_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect()
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_and_status() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&router, Method::GET, "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "insurance");
    assert_eq!(body["step_count"], 10);
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_products_and_steps() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert!(products
        .iter()
        .any(|p| p["key"] == "insurance" && p["has_demo_wizard"] == true));

    let (status, body) = send(&router, Method::GET, "/api/v1/steps", None).await;
    assert_eq!(status, StatusCode::OK);
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 10);
    assert_eq!(steps[0]["name"], "Patient & Payer Selection");
    assert_eq!(steps[3]["is_new"], true);
}

#[tokio::test]
async fn test_openapi_document() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/api/v1/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/sessions/{id}/next"].is_object());
}

// ─── Sessions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_walkthrough_complete_and_advance() {
    let router = test_router();
    let id = create_session(&router).await;

    let (status, body) = send(
        &router,
        Method::POST,
        &session_path(&id, "complete/1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed(&body), vec![1]);
    assert_eq!(body["current_step_id"], 1);

    let (status, body) = send(&router, Method::POST, &session_path(&id, "next"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moved"], true);
    assert_eq!(body["session"]["current_step_id"], 2);
    assert_eq!(body["session"]["current_step_name"], "Order Entry");
}

#[tokio::test]
async fn test_next_at_final_step_stays() {
    let router = test_router();
    let id = create_session(&router).await;

    let (status, _) = send(&router, Method::POST, &session_path(&id, "goto/10"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, Method::POST, &session_path(&id, "next"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moved"], false);
    assert_eq!(body["session"]["current_step_id"], 10);
    assert_eq!(body["session"]["is_final_step"], true);
}

#[tokio::test]
async fn test_goto_invalid_step_is_rejected() {
    let router = test_router();
    let id = create_session(&router).await;

    let (status, body) = send(&router, Method::POST, &session_path(&id, "goto/42"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_step");

    let (status, body) = send(&router, Method::GET, &session_path(&id, ""), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_step_id"], 1);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let router = test_router();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/sessions/00000000-0000-0000-0000-000000000000/next",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_create_with_unknown_product() {
    let router = test_router();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({ "product": "radiology" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let router = test_router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/sessions")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"product": "clinician""#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "bad_request");

    let (_, body) = send(&router, Method::GET, "/api/v1/status", None).await;
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_create_body_without_content_type_is_honored() {
    let router = test_router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/sessions")
        .body(Body::from(r#"{"product": "clinician"}"#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    // clinician has no demo wizard, so the request must not fall back to insurance
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let router = test_router();
    let first = create_session(&router).await;
    let second = create_session(&router).await;

    send(&router, Method::POST, &session_path(&first, "complete/3"), None).await;
    send(&router, Method::POST, &session_path(&first, "goto/5"), None).await;

    let (_, body) = send(&router, Method::GET, &session_path(&second, ""), None).await;
    assert_eq!(body["current_step_id"], 1);
    assert!(completed(&body).is_empty());

    let (_, body) = send(&router, Method::GET, "/api/v1/status", None).await;
    assert_eq!(body["active_sessions"], 2);
}

#[tokio::test]
async fn test_reset_and_delete() {
    let router = test_router();
    let id = create_session(&router).await;

    send(&router, Method::POST, &session_path(&id, "complete/2"), None).await;
    send(&router, Method::POST, &session_path(&id, "goto/7"), None).await;

    let (status, body) = send(&router, Method::POST, &session_path(&id, "reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_step_id"], 1);
    assert!(completed(&body).is_empty());

    let (status, _) = send(&router, Method::DELETE, &session_path(&id, ""), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::GET, &session_path(&id, ""), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
