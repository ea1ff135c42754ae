#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use std::sync::Arc;
use visionlab_service::services::providers::mock::{
    MockLabelDetector, MockStorage, MockTextProvider,
};
use visionlab_service::startup::{build_router, AppState};

pub const TEST_BUCKET: &str = "bucket";
pub const BOUNDARY: &str = "visionlab-test-boundary";

/// Router wired to mock providers, with handles to inspect what they received.
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MockStorage>,
    pub label_detector: Arc<MockLabelDetector>,
    pub text_provider: Arc<MockTextProvider>,
}

impl TestApp {
    pub fn new(labels: &[&str]) -> Self {
        Self::with_providers(
            MockStorage::new(TEST_BUCKET, true),
            MockLabelDetector::new(labels.iter().copied()),
            MockTextProvider::new(true),
        )
    }

    pub fn with_providers(
        storage: MockStorage,
        label_detector: MockLabelDetector,
        text_provider: MockTextProvider,
    ) -> Self {
        let storage = Arc::new(storage);
        let label_detector = Arc::new(label_detector);
        let text_provider = Arc::new(text_provider);

        let state = AppState::new(
            storage.clone(),
            label_detector.clone(),
            text_provider.clone(),
        );

        Self {
            router: build_router(state),
            storage,
            label_detector,
            text_provider,
        }
    }
}

/// One part of a hand-built multipart body.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn file_upload_request(file_name: &str, data: &[u8]) -> Request<Body> {
    upload_request(&[Part {
        name: "file",
        file_name: Some(file_name),
        content_type: Some("image/jpeg"),
        data,
    }])
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
