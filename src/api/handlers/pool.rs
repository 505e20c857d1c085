use crate::api::state::ApiState;
use crate::api::types::PoolStatsResponse;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

/// GET /pool-stats - pool occupancy plus a fresh liveness probe
///
/// Always 200; an unreachable database only shows up in `database_status`.
pub async fn get_pool_stats(
    State(state): State<ApiState>,
) -> (StatusCode, Json<PoolStatsResponse>) {
    let connection_pool = state.pool_reporter.pool_stats();
    let probe = state.prober.check_health().await;

    let response = PoolStatsResponse {
        connection_pool,
        database_status: probe.database_status().to_string(),
        message: probe.message,
        timestamp: Utc::now(),
    };
    (StatusCode::OK, Json(response))
}
