//! Health, docs, and static page tests.

mod helpers;

use helpers::{setup_test_app, setup_test_app_with, FakeEncoder};

#[tokio::test]
async fn test_health_reports_encoder() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["encoder"], "fake");
    assert_eq!(body["encoder_status"], "healthy");
    assert_eq!(body["work_dir"], "healthy");
    assert_eq!(body["encode_slots_available"], 2);
}

#[tokio::test]
async fn test_health_degraded_without_encoder() {
    let app = setup_test_app_with(|_| {}, FakeEncoder::unavailable()).await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["encoder_status"], "unavailable");
}

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;
    let response = app.client().get("/live").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_index_serves_upload_form() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = response.text();
    assert!(html.contains("action=\"/create_video\""));
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"images\""));
    assert!(html.contains("multiple"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header("x-request-id", "trace-123")
        .await;
    assert_eq!(response.header("x-request-id"), "trace-123");

    let response = app.client().get("/live").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app().await;
    let response = app.client().get("/").await;
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/create_video"]["post"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/nope").await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}
