#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use completion_service::config::{ApiKeySource, CompletionSettings};
use completion_service::services::providers::mock::{MockModelProvider, MockOutcome};
use completion_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-test-model";

/// Router wired to a mock provider with a fixed credential.
pub struct TestRouter {
    pub router: Router,
    pub provider: Arc<MockModelProvider>,
}

impl TestRouter {
    pub fn new(outcome: MockOutcome) -> Self {
        Self::with_api_key(outcome, ApiKeySource::fixed(TEST_API_KEY))
    }

    pub fn with_api_key(outcome: MockOutcome, api_key: ApiKeySource) -> Self {
        let provider = Arc::new(MockModelProvider::new(outcome));
        let state = AppState::new(
            CompletionSettings::new(TEST_MODEL),
            api_key,
            provider.clone(),
        );

        Self {
            router: build_router(state),
            provider,
        }
    }

    pub async fn post_completion(&self) -> (StatusCode, Value) {
        self.post_completion_with_body(Body::empty()).await
    }

    pub async fn post_completion_with_body(&self, body: Body) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/gemini")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
