use crate::db::PoolStatsReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `/health` response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub latency_ms: f64,
    pub pool_stats: PoolStatsReport,
    pub timestamp: DateTime<Utc>,
}

/// `/pool-stats` response
#[derive(Debug, Serialize, Deserialize)]
pub struct PoolStatsResponse {
    pub connection_pool: PoolStatsReport,
    pub database_status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// `/metrics` response
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    pub application_metrics: ApplicationMetrics,
    pub database_status: DatabaseStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationMetrics {
    pub start_time: DateTime<Utc>,
    pub requests: RequestCounters,
    pub database: DatabaseCounters,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestCounters {
    pub total: u64,
    pub success: u64,
    pub error: u64,
    pub success_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseCounters {
    pub connections_total: u64,
    pub success: u64,
    pub error: u64,
    pub success_rate: f64,
}

/// Result of the liveness probe run while building `/metrics`
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
    pub message: String,
    pub latency_ms: f64,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NotFound", message, 404)
    }
}
