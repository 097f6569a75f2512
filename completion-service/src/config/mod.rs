pub mod settings;

pub use settings::{
    CompletionSettings, COMPLETION_PROMPT, DEFAULT_MODEL_NAME, GENERATION_CONFIG, SAFETY_POLICY,
};

use secrecy::SecretString;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Environment variable holding the Gemini API key. Read on every request.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Model used for every completion (e.g., gemini-2.5-pro-exp-03-25)
    pub model: String,
    /// Base URL of the generative language API
    pub api_base_url: String,
    /// Upstream request timeout; transport defaults apply when unset
    pub request_timeout_secs: Option<u64>,
}

impl GeminiSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl CompletionConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let request_timeout_secs = get_optional_env("GEMINI_REQUEST_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "GEMINI_REQUEST_TIMEOUT_SECS must be a number of seconds: {}",
                        e
                    ))
                })
            })
            .transpose()?;

        Ok(CompletionConfig {
            common: common_config,
            gemini: GeminiSettings {
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL_NAME), is_prod)?,
                api_base_url: get_env("GEMINI_API_BASE_URL", Some(DEFAULT_API_BASE_URL), is_prod)?,
                request_timeout_secs,
            },
        })
    }
}

/// Where the upstream credential comes from.
///
/// The key is resolved on every request rather than captured at startup, so
/// rotating it in the environment takes effect without a restart.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable.
    Env(&'static str),
    /// Fixed value, used by tests and embedders.
    Static(Option<SecretString>),
}

impl ApiKeySource {
    pub fn from_env() -> Self {
        ApiKeySource::Env(API_KEY_ENV_VAR)
    }

    pub fn fixed(key: impl Into<String>) -> Self {
        ApiKeySource::Static(Some(SecretString::new(key.into())))
    }

    pub fn missing() -> Self {
        ApiKeySource::Static(None)
    }

    /// The configured key; unset and empty both resolve to `None`.
    pub fn resolve(&self) -> Option<SecretString> {
        use secrecy::ExposeSecret;

        match self {
            ApiKeySource::Env(var) => env::var(var)
                .ok()
                .filter(|key| !key.is_empty())
                .map(SecretString::new),
            ApiKeySource::Static(key) => key
                .as_ref()
                .filter(|key| !key.expose_secret().is_empty())
                .cloned(),
        }
    }
}
