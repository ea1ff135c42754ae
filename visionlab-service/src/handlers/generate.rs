use crate::dtos::{GenerateRequest, GenerateResponse};
use crate::services::{reactions_prompt, record_upstream, REACTION_PARAMS};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Describe the reactions between the given labels with the text model.
pub async fn generate_reactions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = reactions_prompt(payload.labels.as_slice());

    tracing::info!(
        label_count = payload.labels.len(),
        prompt_len = prompt.len(),
        "Reaction generation started"
    );

    let response = state
        .text_provider
        .generate(&prompt, &REACTION_PARAMS)
        .await
        .map_err(|e| {
            record_upstream("text", e.kind());
            tracing::error!(error = %e, "Reaction generation failed");
            e
        })?;
    record_upstream("text", "ok");

    tracing::info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Reaction generation completed"
    );

    Ok(Json(GenerateResponse {
        reactions: response.text,
    }))
}
