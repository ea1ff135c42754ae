use crate::dtos::{AnalyzeRequest, AnalyzeResponse};
use crate::services::record_upstream;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Run label detection on a stored image and return the labels unmodified.
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    tracing::info!(gcs_uri = %payload.gcs_uri, "Image analysis started");

    let labels = state
        .label_detector
        .detect_labels(&payload.gcs_uri)
        .await
        .map_err(|e| {
            record_upstream("vision", e.kind());
            tracing::error!(gcs_uri = %payload.gcs_uri, error = %e, "Label detection failed");
            e
        })?;
    record_upstream("vision", "ok");

    tracing::info!(label_count = labels.len(), "Image analysis completed");

    Ok(Json(AnalyzeResponse { labels }))
}
