//! Cloud Storage provider.
//!
//! Uploads objects through the JSON API's simple media upload.

use super::{authorize, gcs_uri, send_checked, ObjectStorage, ProviderError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::Secret;
use serde::Deserialize;

/// Cloud Storage provider configuration.
#[derive(Debug, Clone)]
pub struct GcsConfig {
    pub bucket: String,
    pub api_base: String,
    pub access_token: Option<Secret<String>>,
}

pub struct GcsStorage {
    config: GcsConfig,
    client: Client,
}

impl GcsStorage {
    pub fn new(config: GcsConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.config.api_base.trim_end_matches('/'),
            self.config.bucket
        )
    }
}

#[async_trait]
impl ObjectStorage for GcsStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ProviderError> {
        let size = data.len();

        tracing::debug!(
            bucket = %self.config.bucket,
            object = %name,
            size,
            "Uploading object to Cloud Storage"
        );

        // `name` goes through the query encoder, so slashes and spaces survive as-is.
        let request = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", name)])
            .header(CONTENT_TYPE, content_type)
            .body(data);
        let request = authorize(request, self.config.access_token.as_ref());

        let response = send_checked(request, "Cloud Storage").await?;

        let object: ObjectResource = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(
            bucket = %object.bucket,
            object = %object.name,
            generation = object.generation.as_deref().unwrap_or("-"),
            "Cloud Storage object written"
        );

        Ok(gcs_uri(&self.config.bucket, name))
    }
}

// ============================================================================
// Cloud Storage API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
    bucket: String,
    #[serde(default)]
    generation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(api_base: &str) -> GcsStorage {
        GcsStorage::new(
            GcsConfig {
                bucket: "visionlab".to_string(),
                api_base: api_base.to_string(),
                access_token: None,
            },
            Client::new(),
        )
    }

    #[test]
    fn upload_url_targets_bucket() {
        assert_eq!(
            storage("https://storage.googleapis.com").upload_url(),
            "https://storage.googleapis.com/upload/storage/v1/b/visionlab/o"
        );
    }

    #[test]
    fn upload_url_tolerates_trailing_slash() {
        assert_eq!(
            storage("http://127.0.0.1:9000/").upload_url(),
            "http://127.0.0.1:9000/upload/storage/v1/b/visionlab/o"
        );
    }

    #[test]
    fn object_resource_parses_api_payload() {
        let payload = r#"{
            "kind": "storage#object",
            "name": "cat.jpg",
            "bucket": "visionlab",
            "generation": "1700000000000000",
            "size": "3"
        }"#;
        let object: ObjectResource = serde_json::from_str(payload).unwrap();
        assert_eq!(object.name, "cat.jpg");
        assert_eq!(object.bucket, "visionlab");
        assert_eq!(object.generation.as_deref(), Some("1700000000000000"));
    }
}
