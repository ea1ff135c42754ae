//! Health and metrics endpoint tests.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use common::{body_json, TestApp};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new(&[]);

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "visionlab-service");
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let app = TestApp::new(&[]);

    let response = app
        .router
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!bytes.is_empty());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::new(&[]);

    let response = app
        .router
        .oneshot(Request::builder().uri("/summarize").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
