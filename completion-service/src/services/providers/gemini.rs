//! Gemini AI provider implementation.
//!
//! Calls the `generateContent` REST method of Google's generative language API.

use super::{GenerativeModel, ModelProvider, ProviderError};
use crate::models::gemini::ApiErrorEnvelope;
use crate::models::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
}

/// Gemini model provider.
///
/// Owns the pooled HTTP client; every [`GeminiModel`] handed out shares it.
pub struct GeminiProvider {
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ProviderError::Network(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl ModelProvider for GeminiProvider {
    fn generative_model(&self, api_key: &str, model: &str) -> Box<dyn GenerativeModel> {
        Box::new(GeminiModel {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
            api_key: SecretString::new(api_key.to_string()),
        })
    }
}

/// A Gemini model bound to one API key.
pub struct GeminiModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiModel {
    /// Build the API URL for the given method.
    fn api_url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.model,
            turns = request.contents.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Network(format!("Error fetching from {}: {}", url, e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| e.without_url().to_string());
            return Err(api_error(&url, status, body));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse response: {}",
                e.without_url()
            ))
        })
    }
}

/// Error for a non-success status. Prefers the message of a Google error
/// envelope over the raw body.
fn api_error(url: &str, status: StatusCode, body: Result<String, String>) -> ProviderError {
    let error_text = body.unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(&error_text)
        .ok()
        .map(|envelope| envelope.error);

    let (code, detail) = match envelope {
        Some(body) => (body.status, body.message.unwrap_or(error_text)),
        None => (None, error_text),
    };

    ProviderError::Api {
        status: Some(status.as_u16()),
        code,
        message: format!(
            "Error fetching from {}: [{} {}] {}",
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            detail
        ),
    }
}
