use crate::dtos::{MessageResponse, UploadResponse};
use crate::services::record_upstream;
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

const FILE_FIELD: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Store the `file` part in the bucket under its client-supplied name.
///
/// A request that is not multipart, or carries no named `file` part, is
/// answered with 400 and the "No file uploaded" message. A multipart body
/// that cannot be parsed is a 400 `AppError`. An existing object with the
/// same name is overwritten.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request is not multipart");
            return Ok(no_file_uploaded());
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed multipart body");
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Malformed multipart body: {}",
                    e
                )));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => break,
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
            .to_vec();

        tracing::info!(
            file_name = %file_name,
            content_type = %content_type,
            size = data.len(),
            "Image upload started"
        );

        let gcs_uri = match state.storage.upload(&file_name, &content_type, data).await {
            Ok(uri) => {
                record_upstream("storage", "ok");
                uri
            }
            Err(e) => {
                record_upstream("storage", e.kind());
                tracing::error!(file_name = %file_name, error = %e, "Image upload failed");
                return Err(e.into());
            }
        };

        tracing::info!(gcs_uri = %gcs_uri, "Image uploaded");

        return Ok((StatusCode::OK, Json(UploadResponse::new(gcs_uri))).into_response());
    }

    Ok(no_file_uploaded())
}

fn no_file_uploaded() -> Response {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::no_file())).into_response()
}
