//! Vertex AI text provider.
//!
//! Calls the `:predict` method of a publisher text model (PaLM `text-bison`
//! family) with a single prompt instance.

use super::{
    authorize, send_checked, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// Vertex AI provider configuration.
#[derive(Debug, Clone)]
pub struct VertexAiConfig {
    pub project_id: String,
    pub location: String,
    pub model: String,
    pub api_base: String,
    pub access_token: Option<Secret<String>>,
}

/// Vertex AI text provider.
pub struct VertexTextProvider {
    config: VertexAiConfig,
    client: Client,
}

impl VertexTextProvider {
    pub fn new(config: VertexAiConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the predict URL for the configured project, region and model.
    fn predict_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.config.api_base.trim_end_matches('/'),
            self.config.project_id,
            self.config.location,
            self.config.model
        )
    }
}

fn predict_request(prompt: &str, params: &GenerationParams) -> PredictRequest {
    PredictRequest {
        instances: vec![Instance {
            prompt: prompt.to_string(),
        }],
        parameters: Parameters {
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            top_p: params.top_p,
            top_k: params.top_k,
        },
    }
}

fn into_provider_response(response: PredictResponse) -> Result<ProviderResponse, ProviderError> {
    let prediction = response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("No predictions returned".to_string()))?;

    if prediction
        .safety_attributes
        .as_ref()
        .is_some_and(|attrs| attrs.blocked)
    {
        tracing::warn!("Vertex AI blocked the response on safety grounds");
    }

    let usage = response
        .metadata
        .and_then(|m| m.token_metadata)
        .unwrap_or_default();

    Ok(ProviderResponse {
        text: prediction.content,
        input_tokens: usage
            .input_token_count
            .and_then(|c| c.total_tokens)
            .unwrap_or(0),
        output_tokens: usage
            .output_token_count
            .and_then(|c| c.total_tokens)
            .unwrap_or(0),
    })
}

#[async_trait]
impl TextProvider for VertexTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if self.config.project_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Vertex AI project id not configured".to_string(),
            ));
        }

        tracing::debug!(
            model = %self.config.model,
            location = %self.config.location,
            prompt_len = prompt.len(),
            "Sending request to Vertex AI"
        );

        let request = self
            .client
            .post(self.predict_url())
            .json(&predict_request(prompt, params));
        let request = authorize(request, self.config.access_token.as_ref());

        let response = send_checked(request, "Vertex AI").await?;

        let api_response: PredictResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        into_provider_response(api_response)
    }
}

// ============================================================================
// Vertex AI Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    temperature: f64,
    max_output_tokens: i32,
    top_p: f64,
    top_k: i32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    metadata: Option<PredictMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    content: String,
    #[serde(default)]
    safety_attributes: Option<SafetyAttributes>,
}

#[derive(Debug, Deserialize)]
struct SafetyAttributes {
    #[serde(default)]
    blocked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictMetadata {
    #[serde(default)]
    token_metadata: Option<TokenMetadata>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TokenMetadata {
    input_token_count: Option<TokenCount>,
    output_token_count: Option<TokenCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenCount {
    total_tokens: Option<i32>,
}
