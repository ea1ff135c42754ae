//! Mock provider implementations for testing.

use super::{
    gcs_uri, GenerationParams, LabelDetector, ObjectStorage, ProviderError, ProviderResponse,
    TextProvider,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory object storage keyed by object name.
pub struct MockStorage {
    bucket: String,
    enabled: bool,
    objects: Mutex<HashMap<String, StoredObject>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MockStorage {
    pub fn new(bucket: impl Into<String>, enabled: bool) -> Self {
        Self {
            bucket: bucket.into(),
            enabled,
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn object(&self, name: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(name).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::ApiError(
                "Mock storage not enabled".to_string(),
            ));
        }

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| ProviderError::ApiError("Mock storage poisoned".to_string()))?;
        objects.insert(
            name.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );

        Ok(gcs_uri(&self.bucket, name))
    }
}

/// Label detector that answers every request with a fixed label list.
pub struct MockLabelDetector {
    labels: Option<Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl MockLabelDetector {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: Some(labels.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A detector whose every call fails like an unreachable upstream.
    pub fn failing() -> Self {
        Self {
            labels: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Image URIs received so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LabelDetector for MockLabelDetector {
    async fn detect_labels(&self, image_uri: &str) -> Result<Vec<String>, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(image_uri.to_string());
        }

        self.labels
            .clone()
            .ok_or_else(|| ProviderError::NetworkError("Mock label detector failing".to_string()))
    }
}

/// Text provider that echoes the prompt and records every call.
pub struct MockTextProvider {
    enabled: bool,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts and parameters received so far, oldest first.
    pub fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), *params));
        }

        Ok(ProviderResponse {
            text: format!("Mock response for: {}", prompt),
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 10,
        })
    }
}
