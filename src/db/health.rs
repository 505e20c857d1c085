use super::ConnectionAccessor;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Outcome of one liveness probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResult {
    pub healthy: bool,
    pub message: String,
    pub latency_ms: f64,
}

impl HealthResult {
    fn connected(latency_ms: f64) -> Self {
        Self {
            healthy: true,
            message: format!("Connected ({}ms)", latency_ms),
            latency_ms,
        }
    }

    fn failed(latency_ms: f64, error: impl std::fmt::Display) -> Self {
        Self {
            healthy: false,
            message: format!("Connection Error ({}ms): {}", latency_ms, error),
            latency_ms,
        }
    }

    /// `"connected"` or `"disconnected"`.
    pub fn database_status(&self) -> &'static str {
        if self.healthy {
            "connected"
        } else {
            "disconnected"
        }
    }
}

/// Runs `SELECT 1` through the accessor and times it.
///
/// Never fails: acquisition and query errors come back as an unhealthy result.
/// Every call performs a fresh round trip.
#[derive(Clone)]
pub struct HealthProber {
    accessor: Arc<ConnectionAccessor>,
}

impl HealthProber {
    pub fn new(accessor: Arc<ConnectionAccessor>) -> Self {
        Self { accessor }
    }

    pub async fn check_health(&self) -> HealthResult {
        let started = Instant::now();
        let outcome = self.accessor.with_connection(|conn| conn.ping()).await;
        let latency_ms = round_millis(started.elapsed().as_secs_f64() * 1000.0);

        let result = match outcome {
            Ok(()) => HealthResult::connected(latency_ms),
            Err(e) => HealthResult::failed(latency_ms, e),
        };
        debug!(healthy = result.healthy, latency_ms, "Database liveness probe finished");
        result
    }
}

/// Round to two decimal places.
fn round_millis(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
