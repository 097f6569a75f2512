//! Mock provider implementation for testing.

use super::{GenerativeModel, ModelProvider, ProviderError};
use crate::models::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Canned result returned by every [`MockModel`] call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Response(GenerateContentResponse),
    Error(ProviderError),
}

impl MockOutcome {
    /// A successful response whose only candidate carries `text`.
    pub fn text(text: impl Into<String>) -> Self {
        MockOutcome::Response(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part::text(text)],
                }),
                finish_reason: Some("STOP".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        })
    }
}

/// Mock model provider recording how it is used.
pub struct MockModelProvider {
    outcome: MockOutcome,
    models_built: AtomicUsize,
    credentials: Mutex<Vec<(String, String)>>,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

impl MockModelProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            models_built: AtomicUsize::new(0),
            credentials: Mutex::new(Vec::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of model handles constructed.
    pub fn models_built(&self) -> usize {
        self.models_built.load(Ordering::SeqCst)
    }

    /// `(api_key, model)` pairs handles were built with.
    pub fn credentials(&self) -> Vec<(String, String)> {
        self.credentials
            .lock()
            .map(|creds| creds.clone())
            .unwrap_or_default()
    }

    /// Requests received by any handle, in call order.
    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl ModelProvider for MockModelProvider {
    fn generative_model(&self, api_key: &str, model: &str) -> Box<dyn GenerativeModel> {
        self.models_built.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut creds) = self.credentials.lock() {
            creds.push((api_key.to_string(), model.to_string()));
        }

        Box::new(MockModel {
            outcome: self.outcome.clone(),
            requests: Arc::clone(&self.requests),
        })
    }
}

/// Mock model returning the provider's canned outcome.
pub struct MockModel {
    outcome: MockOutcome,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.outcome {
            MockOutcome::Response(response) => Ok(response.clone()),
            MockOutcome::Error(err) => Err(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_models_and_requests() {
        let provider = MockModelProvider::new(MockOutcome::text("hello"));
        let request = crate::config::CompletionSettings::default().generate_content_request();

        let model = provider.generative_model("key", "gemini-test");
        let response = model.generate_content(&request).await.unwrap();

        assert_eq!(response.text().as_deref(), Some("hello"));
        assert_eq!(provider.models_built(), 1);
        assert_eq!(
            provider.credentials(),
            vec![("key".to_string(), "gemini-test".to_string())]
        );
        assert_eq!(provider.requests(), vec![request]);
    }

    #[tokio::test]
    async fn returns_canned_errors() {
        let provider =
            MockModelProvider::new(MockOutcome::Error(ProviderError::Network("down".into())));
        let request = crate::config::CompletionSettings::default().generate_content_request();

        let err = provider
            .generative_model("key", "gemini-test")
            .generate_content(&request)
            .await
            .unwrap_err();

        assert_eq!(err, ProviderError::Network("down".into()));
    }
}
