//! Upstream generative-model abstractions and implementations.
//!
//! A [`ModelProvider`] turns a credential and model name into a
//! [`GenerativeModel`] handle. Handles are built per request; the provider
//! itself is shared.

pub mod gemini;
pub mod mock;

use crate::models::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Message substrings that mark an upstream failure as a bad model name or a
/// denied permission.
pub const ACCESS_DENIED_MARKERS: [&str; 3] = ["MODEL_NAME_INVALID", "not found", "permission"];

/// Error type for provider operations.
///
/// Display is the bare upstream message; it is what callers see as `details`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The upstream answered with an error status.
    #[error("{message}")]
    Api {
        /// HTTP status, when the failure came from an HTTP response.
        status: Option<u16>,
        /// Google RPC status such as `NOT_FOUND` or `PERMISSION_DENIED`.
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn message(&self) -> &str {
        match self {
            ProviderError::Api { message, .. } => message,
            ProviderError::Network(message) | ProviderError::InvalidResponse(message) => message,
        }
    }

    /// Whether the failure means the model does not exist or the key may not
    /// use it.
    ///
    /// Structured status information is checked first; the message is always
    /// scanned as well so errors without a status classify the same way.
    pub fn is_access_denied(&self) -> bool {
        let structured = match self {
            ProviderError::Api { status, code, .. } => {
                matches!(status, Some(403 | 404))
                    || matches!(code.as_deref(), Some("NOT_FOUND" | "PERMISSION_DENIED"))
            }
            _ => false,
        };

        structured
            || ACCESS_DENIED_MARKERS
                .iter()
                .any(|marker| self.message().contains(marker))
    }
}

/// A model handle bound to one credential.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Issue a single `generateContent` call.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;
}

/// Factory for [`GenerativeModel`] handles.
pub trait ModelProvider: Send + Sync {
    fn generative_model(&self, api_key: &str, model: &str) -> Box<dyn GenerativeModel>;
}
