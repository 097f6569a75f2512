//! Application startup and lifecycle management.
//!
//! Builds the HTTP router (completion endpoint, health, metrics) and runs it
//! until a shutdown signal arrives.

use crate::config::{ApiKeySource, CompletionConfig, CompletionSettings};
use crate::handlers::{completion::generate_completion, health::health_check, metrics::metrics};
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::ModelProvider;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<CompletionSettings>,
    pub api_key: ApiKeySource,
    pub provider: Arc<dyn ModelProvider>,
}

impl AppState {
    pub fn new(
        settings: CompletionSettings,
        api_key: ApiKeySource,
        provider: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            api_key,
            provider,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/gemini", post(generate_completion))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: CompletionConfig) -> Result<Self, AppError> {
        let provider = GeminiProvider::new(GeminiConfig {
            api_base_url: config.gemini.api_base_url.clone(),
            request_timeout: config.gemini.request_timeout(),
        })
        .map_err(|e| {
            tracing::error!("Failed to initialize Gemini provider: {}", e);
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

        tracing::info!(
            model = %config.gemini.model,
            base_url = %config.gemini.api_base_url,
            "Initialized Gemini provider"
        );

        let state = AppState::new(
            CompletionSettings::new(config.gemini.model.clone()),
            ApiKeySource::from_env(),
            Arc::new(provider),
        );

        Self::build_with_state(config.common.port, state).await
    }

    /// Bind `port` (0 = random port for testing) and serve `state`.
    pub async fn build_with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Completion service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
