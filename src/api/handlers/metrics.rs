use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};
use chrono::Utc;

use crate::api::state::ApiState;
use crate::api::types::{
    ApplicationMetrics, DatabaseCounters, DatabaseStatus, MetricsResponse, RequestCounters,
};

/// GET /metrics - request and connection counters with success rates
///
/// The probe runs before the snapshot so its checkout is already counted. A
/// failing probe is reported in `database_status`; the status stays 200.
pub async fn get_metrics(State(state): State<ApiState>) -> (StatusCode, Json<MetricsResponse>) {
    let probe = state.prober.check_health().await;
    let snapshot = state.metrics.snapshot();

    let response = MetricsResponse {
        timestamp: Utc::now(),
        uptime_seconds: state.metrics.uptime_seconds(),
        application_metrics: ApplicationMetrics {
            start_time: snapshot.start_time,
            requests: RequestCounters {
                total: snapshot.requests_total,
                success: snapshot.requests_success,
                error: snapshot.requests_error,
                success_rate: snapshot.request_success_rate(),
            },
            database: DatabaseCounters {
                connections_total: snapshot.db_connections_total,
                success: snapshot.db_connections_success,
                error: snapshot.db_connections_error,
                success_rate: snapshot.db_success_rate(),
            },
        },
        database_status: DatabaseStatus {
            status: probe.database_status().to_string(),
            message: probe.message,
            latency_ms: probe.latency_ms,
        },
    };

    (StatusCode::OK, Json(response))
}

/// GET /metrics/prometheus - the same counters in Prometheus text format
pub async fn get_prometheus_metrics(
    State(state): State<ApiState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render_prometheus(),
    )
}
