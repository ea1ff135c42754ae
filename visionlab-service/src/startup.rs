//! Application startup and lifecycle management.
//!
//! Builds the upstream clients once, wires them into [`AppState`] and serves
//! the HTTP API until a shutdown signal arrives.

use crate::config::VisionlabConfig;
use crate::handlers;
use crate::services::providers::gcs::{GcsConfig, GcsStorage};
use crate::services::providers::vertex::{VertexAiConfig, VertexTextProvider};
use crate::services::providers::vision::{CloudVisionLabeler, VisionApiConfig};
use crate::services::providers::{LabelDetector, ObjectStorage, TextProvider};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Provider handles are created once at startup and shared read-only by
/// every request.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub label_detector: Arc<dyn LabelDetector>,
    pub text_provider: Arc<dyn TextProvider>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        label_detector: Arc<dyn LabelDetector>,
        text_provider: Arc<dyn TextProvider>,
    ) -> Self {
        Self {
            storage,
            label_detector,
            text_provider,
        }
    }

    /// Build the Google-backed providers from configuration.
    pub fn from_config(config: &VisionlabConfig) -> Result<Self, AppError> {
        let client = Client::builder().build().map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
        })?;
        let access_token = config.google.access_token.clone();

        let storage = GcsStorage::new(
            GcsConfig {
                bucket: config.storage.bucket.clone(),
                api_base: config.storage.api_base.clone(),
                access_token: access_token.clone(),
            },
            client.clone(),
        );
        tracing::info!(bucket = %config.storage.bucket, "Initialized Cloud Storage provider");

        let label_detector = CloudVisionLabeler::new(
            VisionApiConfig {
                api_base: config.vision.api_base.clone(),
                access_token: access_token.clone(),
            },
            client.clone(),
        );
        tracing::info!("Initialized Cloud Vision provider");

        if config.vertex.project_id.is_empty() {
            tracing::warn!("GCP_PROJECT_ID is not set; reaction generation will fail");
        }
        let text_provider = VertexTextProvider::new(
            VertexAiConfig {
                project_id: config.vertex.project_id.clone(),
                location: config.vertex.location.clone(),
                model: config.vertex.model.clone(),
                api_base: config.vertex.api_base.clone(),
                access_token,
            },
            client,
        );
        tracing::info!(
            model = %config.vertex.model,
            location = %config.vertex.location,
            "Initialized Vertex AI text provider"
        );

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(label_detector),
            Arc::new(text_provider),
        ))
    }
}

/// Build the HTTP router with every route and middleware layer.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        // Uploads carry no size limit.
        .route(
            "/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::disable()),
        )
        .route("/analyze", post(handlers::analyze_image))
        .route("/generate", post(handlers::generate_reactions))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Google-backed providers.
    pub async fn build(config: VisionlabConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(config, state).await
    }

    /// Build the application around an already assembled state.
    pub async fn build_with_state(
        config: VisionlabConfig,
        state: AppState,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Visionlab service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
