use crate::models::{GenerateContentResponse, SafetyRating};
use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use service_core::error::ErrorBody;
use thiserror::Error;

/// Placeholder used when an upstream failure carries no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Failures of the completion endpoint, each rendered as a JSON error body.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Failed to get response from Gemini API")]
    ContentBlocked(Box<BlockedDetails>),

    #[error(
        "Model name '{model}' not found or access denied. Check the model name and your API key permissions."
    )]
    UpstreamAccess { model: String, details: String },

    #[error("Error communicating with Gemini API")]
    Upstream { details: String },
}

/// Diagnostics for a response that produced no usable text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
    pub full_result: Value,
}

impl CompletionError {
    pub fn blocked(response: &GenerateContentResponse) -> Self {
        CompletionError::ContentBlocked(Box::new(BlockedDetails {
            block_reason: response.block_reason().map(str::to_string),
            safety_ratings: response.safety_ratings().map(<[SafetyRating]>::to_vec),
            full_result: serde_json::to_value(response).unwrap_or(Value::Null),
        }))
    }

    /// Classify an upstream failure for the configured `model`.
    pub fn from_provider(err: &ProviderError, model: &str) -> Self {
        let details = if err.message().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            err.message().to_string()
        };

        if err.is_access_denied() {
            CompletionError::UpstreamAccess {
                model: model.to_string(),
                details,
            }
        } else {
            CompletionError::Upstream { details }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CompletionError::UpstreamAccess { .. } => StatusCode::BAD_REQUEST,
            CompletionError::MissingApiKey
            | CompletionError::ContentBlocked(_)
            | CompletionError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            CompletionError::MissingApiKey => "missing_api_key",
            CompletionError::ContentBlocked(_) => "blocked",
            CompletionError::UpstreamAccess { .. } => "access_denied",
            CompletionError::Upstream { .. } => "upstream_error",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            CompletionError::MissingApiKey => None,
            CompletionError::ContentBlocked(details) => serde_json::to_value(details).ok(),
            CompletionError::UpstreamAccess { details, .. } | CompletionError::Upstream { details } => {
                Some(Value::String(details.clone()))
            }
        }
    }
}

impl IntoResponse for CompletionError {
    fn into_response(self) -> Response {
        let mut body = ErrorBody::new(self.to_string());
        if let Some(details) = self.details() {
            body = body.with_details(details);
        }
        body.into_response(self.status_code())
    }
}
