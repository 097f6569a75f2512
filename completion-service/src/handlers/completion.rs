use axum::{extract::State, Json};
use secrecy::ExposeSecret;

use crate::error::CompletionError;
use crate::models::CompletionResponse;
use crate::services::record_completion;
use crate::startup::AppState;

/// `POST /api/gemini`: send the fixed prompt upstream and return its text.
///
/// The request body is ignored.
#[tracing::instrument(skip_all, fields(model = %state.settings.model))]
pub async fn generate_completion(
    State(state): State<AppState>,
) -> Result<Json<CompletionResponse>, CompletionError> {
    let result = complete(&state).await;

    match &result {
        Ok(_) => record_completion("success"),
        Err(e) => record_completion(e.outcome()),
    }

    result.map(Json)
}

async fn complete(state: &AppState) -> Result<CompletionResponse, CompletionError> {
    let api_key = state.api_key.resolve().ok_or_else(|| {
        tracing::error!("Gemini API key is not configured");
        CompletionError::MissingApiKey
    })?;

    let settings = &state.settings;
    let model = state
        .provider
        .generative_model(api_key.expose_secret(), &settings.model);

    let response = model
        .generate_content(&settings.generate_content_request())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Error calling Gemini API");
            CompletionError::from_provider(&e, &settings.model)
        })?;

    match response.text() {
        Some(text) => {
            tracing::info!(text_len = text.len(), "Gemini completion succeeded");
            Ok(CompletionResponse { text })
        }
        None => {
            tracing::error!(
                block_reason = ?response.block_reason(),
                candidates = response.candidates.len(),
                "Gemini API response blocked or empty"
            );
            Err(CompletionError::blocked(&response))
        }
    }
}
