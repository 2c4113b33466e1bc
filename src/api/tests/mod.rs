use super::*;
use crate::campaign::test_helpers::create_test_mailer;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt; // for oneshot()

/// Helper to create a router over a test mailer with default fixtures
async fn create_test_app() -> (
    Router,
    Arc<CampaignMailer>,
    std::sync::Arc<crate::campaign::test_helpers::RecordingSender>,
    tempfile::TempDir,
) {
    let (mailer, _store, sender, temp_dir) = create_test_mailer(10).await;
    let mailer = Arc::new(mailer);
    let config = mailer.config.clone();
    let app = create_router(mailer.clone(), config);
    (app, mailer, sender, temp_dir)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _mailer, _sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_status_endpoint_returns_snapshot() {
    let (app, _mailer, _sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .uri("/campaign/status")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["running"], false);
    assert_eq!(json["total_sent"], 0);
    assert!(json["last_receiver"].is_null());
}

#[tokio::test]
async fn test_run_endpoint_starts_batch() {
    let (app, mailer, sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/campaign/run")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"limit": 2}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "started");

    // Wait for the background run to finish
    for _ in 0..100 {
        if !mailer.status().await.running && !sender.sent().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(sender.delivered_to("ops@x"), vec!["r1@x", "r3@x"]);
}

#[tokio::test]
async fn test_run_endpoint_accepts_empty_body() {
    let (app, mailer, _sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/campaign/run")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    for _ in 0..100 {
        if !mailer.status().await.running {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_run_endpoint_rejects_concurrent_run() {
    let (app, _mailer, sender, _temp) = create_test_app().await;
    sender.set_delay(Duration::from_millis(300));

    let first = Request::builder()
        .method("POST")
        .uri("/campaign/run")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(first).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = Request::builder()
        .method("POST")
        .uri("/campaign/run")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "busy");
}

#[tokio::test]
async fn test_run_endpoint_reports_completion() {
    let (app, mailer, sender, _temp) = create_test_app().await;
    mailer.db.advance_cursor(10, "r3@x", "b@x").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/campaign/run")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "complete");
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_openapi_spec_served() {
    let (app, _mailer, _sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let spec: Value = serde_json::from_slice(&body).unwrap();
    assert!(spec["paths"]["/campaign/run"].is_object());
    assert!(spec["paths"]["/campaign/status"].is_object());
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _mailer, _sender, _temp) = create_test_app().await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}
