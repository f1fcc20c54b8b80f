mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use common::{analyzer_with, StubResolver};
use linkguard_engine::routes::{self, AppContext};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(max_batch_size: usize) -> Router {
    routes::router(Arc::new(AppContext {
        analyzer: analyzer_with(StubResolver::passthrough()),
        max_batch_size,
    }))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = app(10)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "linkguard-engine");
}

#[tokio::test]
async fn analyze_returns_verdict_and_details() {
    let (status, body) = post_json(
        app(10),
        "/analyze",
        json!({ "text": "Go to google.com", "url": "https://evil-site.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_suspicious"], true);
    assert_eq!(body["reason"], "domain_mismatch");
    assert_eq!(body["message"], "Domain mismatch");
    assert_eq!(body["details"]["actual_domain"], "evil-site.com");
    assert!(body["analysis_id"].is_string());
}

#[tokio::test]
async fn analyze_with_missing_fields_fails_open() {
    let (status, body) = post_json(app(10), "/analyze", json!({ "url": "https://evil.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_suspicious"], false);
    assert_eq!(body["reason"], "missing_input");
}

#[tokio::test]
async fn batch_preserves_input_order() {
    let (status, body) = post_json(
        app(10),
        "/analyze/batch",
        json!({ "links": [
            { "text": "example.com", "url": "http://example.com" },
            { "text": "Go to google.com", "url": "https://www.google.com" },
            { "text": "Call (555) 123-4567", "url": "tel:+1-555-999-8888" }
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reasons: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["reason"].as_str().unwrap())
        .collect();
    assert_eq!(reasons, vec!["insecure_http", "domain_match", "phone_mismatch"]);
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let links: Vec<Value> = (0..3)
        .map(|i| json!({ "text": "example.com", "url": format!("https://example.com/{}", i) }))
        .collect();
    let (status, body) = post_json(app(2), "/analyze/batch", json!({ "links": links })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("exceeds the limit of 2"));
}
