use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness check. The service has no backing store, so being able to answer
/// is the whole check.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "completion-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
