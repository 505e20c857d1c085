use axum::{extract::State, http::StatusCode, http::Uri, Json};
use chrono::Utc;

use crate::api::state::ApiState;
use crate::api::types::{ErrorResponse, HealthResponse};

/// GET /health - 200 when the liveness probe succeeds, 503 otherwise
pub async fn health_check(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = state.prober.check_health().await;
    let pool_stats = state.pool_reporter.pool_stats();

    let (status_code, status) = if probe.healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = HealthResponse {
        status: status.to_string(),
        database: probe.message,
        latency_ms: probe.latency_ms,
        pool_stats,
        timestamp: Utc::now(),
    };

    (status_code, Json(response))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found(format!("No route for {}", uri.path()))),
    )
}
