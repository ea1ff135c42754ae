//! Cloud Vision provider.
//!
//! Runs `LABEL_DETECTION` on an image referenced by URI and returns the label
//! descriptions exactly as annotated.

use super::{authorize, send_checked, LabelDetector, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// Cloud Vision provider configuration.
#[derive(Debug, Clone)]
pub struct VisionApiConfig {
    pub api_base: String,
    pub access_token: Option<Secret<String>>,
}

pub struct CloudVisionLabeler {
    config: VisionApiConfig,
    client: Client,
}

impl CloudVisionLabeler {
    pub fn new(config: VisionApiConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn annotate_url(&self) -> String {
        format!(
            "{}/v1/images:annotate",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

fn label_request(image_uri: &str) -> BatchAnnotateImagesRequest {
    BatchAnnotateImagesRequest {
        requests: vec![AnnotateImageRequest {
            image: Image {
                source: ImageSource {
                    image_uri: image_uri.to_string(),
                },
            },
            features: vec![Feature {
                feature_type: "LABEL_DETECTION".to_string(),
            }],
        }],
    }
}

fn extract_labels(response: BatchAnnotateImagesResponse) -> Result<Vec<String>, ProviderError> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(status) = first.error {
        return Err(ProviderError::ApiError(format!(
            "Cloud Vision annotation error {}: {}",
            status.code, status.message
        )));
    }

    Ok(first
        .label_annotations
        .into_iter()
        .map(|annotation| annotation.description)
        .collect())
}

#[async_trait]
impl LabelDetector for CloudVisionLabeler {
    async fn detect_labels(&self, image_uri: &str) -> Result<Vec<String>, ProviderError> {
        tracing::debug!(image_uri = %image_uri, "Requesting label detection from Cloud Vision");

        let request = self
            .client
            .post(self.annotate_url())
            .json(&label_request(image_uri));
        let request = authorize(request, self.config.access_token.as_ref());

        let response = send_checked(request, "Cloud Vision").await?;

        let api_response: BatchAnnotateImagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_labels(api_response)
    }
}

// ============================================================================
// Cloud Vision API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct BatchAnnotateImagesRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    source: ImageSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSource {
    image_uri: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
}

#[derive(Debug, Deserialize)]
struct BatchAnnotateImagesResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}
