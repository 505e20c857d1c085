use chrono::{DateTime, Utc};
use prometheus::{IntCounter, Opts, Registry, TextEncoder};
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

/// Point-in-time copy of the request and database counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_success: u64,
    pub requests_error: u64,
    pub db_connections_total: u64,
    pub db_connections_success: u64,
    pub db_connections_error: u64,
    pub start_time: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Percentage of requests answered with a status below 400.
    pub fn request_success_rate(&self) -> f64 {
        success_rate(self.requests_success, self.requests_total)
    }

    /// Percentage of connection checkouts whose unit of work succeeded.
    pub fn db_success_rate(&self) -> f64 {
        success_rate(self.db_connections_success, self.db_connections_total)
    }
}

/// `total` is floored at 1 so an idle process reports 0% instead of NaN.
pub fn success_rate(success: u64, total: u64) -> f64 {
    success as f64 / total.max(1) as f64 * 100.0
}

/// Process-wide request and connection counters.
///
/// Created once at startup and shared as `Arc<MetricsRegistry>`. Every counter is a
/// lock-free `IntCounter` held in a registry owned by this instance, so concurrent
/// handlers never contend on a lock and separate instances (tests) never collide.
pub struct MetricsRegistry {
    registry: Registry,
    requests_total: IntCounter,
    requests_success: IntCounter,
    requests_error: IntCounter,
    db_connections_total: IntCounter,
    db_connections_success: IntCounter,
    db_connections_error: IntCounter,
    started_at: Instant,
    start_time: DateTime<Utc>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let registry = Registry::new();

        Self {
            requests_total: register_counter(
                &registry,
                "poolsight_requests_total",
                "Total number of HTTP requests received",
            ),
            requests_success: register_counter(
                &registry,
                "poolsight_requests_success_total",
                "HTTP requests answered with a status below 400",
            ),
            requests_error: register_counter(
                &registry,
                "poolsight_requests_error_total",
                "HTTP requests answered with a status of 400 or above",
            ),
            db_connections_total: register_counter(
                &registry,
                "poolsight_db_connections_total",
                "Database connection checkouts attempted",
            ),
            db_connections_success: register_counter(
                &registry,
                "poolsight_db_connections_success_total",
                "Database connection checkouts whose work completed",
            ),
            db_connections_error: register_counter(
                &registry,
                "poolsight_db_connections_error_total",
                "Database connection checkouts that failed to acquire or whose work failed",
            ),
            registry,
            started_at: Instant::now(),
            start_time: Utc::now(),
        }
    }

    #[inline]
    pub fn increment_request_total(&self) {
        self.requests_total.inc();
    }

    #[inline]
    pub fn record_request_outcome(&self, status_code: u16) {
        if status_code < 400 {
            self.requests_success.inc();
        } else {
            self.requests_error.inc();
        }
    }

    #[inline]
    pub fn increment_db_total(&self) {
        self.db_connections_total.inc();
    }

    #[inline]
    pub fn record_db_outcome(&self, success: bool) {
        if success {
            self.db_connections_success.inc();
        } else {
            self.db_connections_error.inc();
        }
    }

    /// Read all counters.
    ///
    /// Counters are loaded one at a time with no common lock, so a snapshot taken
    /// while requests are in flight may mix values from slightly different moments.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests_success = self.requests_success.get();
        let requests_error = self.requests_error.get();
        let db_connections_success = self.db_connections_success.get();
        let db_connections_error = self.db_connections_error.get();

        MetricsSnapshot {
            requests_total: self.requests_total.get(),
            requests_success,
            requests_error,
            db_connections_total: self.db_connections_total.get(),
            db_connections_success,
            db_connections_error,
            start_time: self.start_time,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Render the counters in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        match TextEncoder::new().encode_to_string(&self.registry.gather()) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode Prometheus metrics");
                String::new()
            }
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn register_counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::with_opts(Opts::new(name, help))
        .unwrap_or_else(|e| panic!("create {} counter: {}", name, e));
    registry
        .register(Box::new(counter.clone()))
        .unwrap_or_else(|e| panic!("register {} counter: {}", name, e));
    counter
}
