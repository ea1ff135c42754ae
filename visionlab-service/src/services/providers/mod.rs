//! Upstream provider abstractions and implementations.
//!
//! Each managed service the pipeline relies on sits behind a trait so the
//! Google backends can be swapped for the mocks in tests.

pub mod gcs;
pub mod mock;
pub mod vertex;
pub mod vision;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

// Upstream failures are not distinguished from one another by clients.
impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Sampling configuration for a text generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_output_tokens: i32,
    pub top_p: f64,
    pub top_k: i32,
}

/// Result of a text generation call.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,

    /// Input tokens consumed, when the provider reports them.
    pub input_tokens: i32,

    /// Output tokens generated, when the provider reports them.
    pub output_tokens: i32,
}

/// Object storage backend (e.g., Cloud Storage).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `data` under `name`, replacing any existing object, and return
    /// the locator of the stored object.
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ProviderError>;
}

/// Image labeling backend (e.g., Cloud Vision).
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detect labels for the image at `image_uri`, in the order the provider returns them.
    async fn detect_labels(&self, image_uri: &str) -> Result<Vec<String>, ProviderError>;
}

/// Text generation backend (e.g., Vertex AI).
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}

/// Locator for an object stored in a Cloud Storage bucket.
pub fn gcs_uri(bucket: &str, name: &str) -> String {
    format!("gs://{}/{}", bucket, name)
}

/// Attach the bearer token, if one is configured.
pub(crate) fn authorize(
    request: RequestBuilder,
    access_token: Option<&Secret<String>>,
) -> RequestBuilder {
    match access_token {
        Some(token) => request.bearer_auth(token.expose_secret()),
        None => request,
    }
}

/// Send a request and turn transport failures and non-2xx statuses into
/// provider errors.
pub(crate) async fn send_checked(
    request: RequestBuilder,
    provider: &str,
) -> Result<Response, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }

        return Err(ProviderError::ApiError(format!(
            "{} API error {}: {}",
            provider, status, error_text
        )));
    }

    Ok(response)
}
