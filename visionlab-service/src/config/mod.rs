use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_BUCKET: &str = "your-bucket";
pub const DEFAULT_VERTEX_LOCATION: &str = "us-central1";
pub const DEFAULT_TEXT_MODEL: &str = "text-bison@001";

pub const GCS_API_BASE: &str = "https://storage.googleapis.com";
pub const VISION_API_BASE: &str = "https://vision.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct VisionlabConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
    pub vision: VisionConfig,
    pub vertex: VertexConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket every upload is written to.
    pub bucket: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexConfig {
    /// Project hosting the text model. Empty means text generation is unavailable.
    pub project_id: String,
    pub location: String,
    pub model: String,
    /// Regional endpoint; derived from `location` unless overridden.
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Bearer token attached to every upstream call when present.
    pub access_token: Option<Secret<String>>,
}

impl VisionlabConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let location = get_env("VERTEX_LOCATION", Some(DEFAULT_VERTEX_LOCATION), is_prod)?;
        let vertex_base = vertex_api_base(&location);

        Ok(VisionlabConfig {
            common: common_config,
            storage: StorageConfig {
                bucket: get_env("GCS_BUCKET", Some(DEFAULT_BUCKET), is_prod)?,
                api_base: get_env("GCS_API_BASE", Some(GCS_API_BASE), is_prod)?,
            },
            vision: VisionConfig {
                api_base: get_env("VISION_API_BASE", Some(VISION_API_BASE), is_prod)?,
            },
            vertex: VertexConfig {
                project_id: get_env("GCP_PROJECT_ID", Some(""), is_prod)?,
                model: get_env("VERTEX_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL), is_prod)?,
                api_base: get_env("VERTEX_API_BASE", Some(&vertex_base), is_prod)?,
                location,
            },
            google: GoogleConfig {
                access_token: env::var("GOOGLE_ACCESS_TOKEN")
                    .ok()
                    .filter(|token| !token.is_empty())
                    .map(Secret::new),
            },
        })
    }
}

/// Regional Vertex AI endpoint, e.g. `https://us-central1-aiplatform.googleapis.com`.
pub fn vertex_api_base(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
