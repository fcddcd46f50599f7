//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub version: String,
    pub encoder: String,
    /// "healthy", "unavailable" or "timeout"
    pub encoder_status: String,
    /// "healthy", "timeout" or "unhealthy: {reason}"
    pub work_dir: String,
    pub encode_slots_available: usize,
    pub uptime_secs: u64,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Full health check: encoder binary and work directory.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Ready to encode", body = HealthCheckResponse),
        (status = 503, description = "Encoder or work directory unusable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pipeline = &state.pipeline;

    let encoder_status = match tokio::time::timeout(CHECK_TIMEOUT, pipeline.encoder_available()).await
    {
        Ok(true) => "healthy".to_string(),
        Ok(false) => "unavailable".to_string(),
        Err(_) => "timeout".to_string(),
    };

    let work_dir = match tokio::time::timeout(CHECK_TIMEOUT, pipeline.provider().ensure_root()).await
    {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("unhealthy: {}", e),
        Err(_) => "timeout".to_string(),
    };

    let healthy = encoder_status == "healthy" && work_dir == "healthy";
    if !healthy {
        tracing::warn!(
            encoder_status = %encoder_status,
            work_dir = %work_dir,
            "Health check failed"
        );
    }

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        encoder: pipeline.encoder_name().to_string(),
        encoder_status,
        work_dir,
        encode_slots_available: pipeline.available_encode_slots(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
