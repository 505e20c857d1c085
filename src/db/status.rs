use super::{ConnectionAccessor, PoolStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Pool statistics, or the reason they could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolStatsReport {
    Available(PoolStatus),
    Unavailable { error: String },
}

impl PoolStatsReport {
    pub fn status(&self) -> Option<&PoolStatus> {
        match self {
            PoolStatsReport::Available(status) => Some(status),
            PoolStatsReport::Unavailable { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct PoolStatusReporter {
    accessor: Arc<ConnectionAccessor>,
}

impl PoolStatusReporter {
    pub fn new(accessor: Arc<ConnectionAccessor>) -> Self {
        Self { accessor }
    }

    /// Read the pool's counters. Introspection failures degrade to an error report.
    pub fn pool_stats(&self) -> PoolStatsReport {
        match self.accessor.pool_status() {
            Ok(status) => PoolStatsReport::Available(status),
            Err(e) => {
                warn!(error = %e, "Connection pool statistics unavailable");
                PoolStatsReport::Unavailable {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_serializes_as_error_object() {
        let report = PoolStatsReport::Unavailable {
            error: "pool is closed".to_string(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "pool is closed" }));
        assert!(report.status().is_none());
    }

    #[test]
    fn available_serializes_flat() {
        let report = PoolStatsReport::Available(PoolStatus {
            pool_name: "poolsight_pool".to_string(),
            configured_size: 5,
            active_connections: 1,
            idle_connections: 2,
            total_connections: 3,
        });
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["configured_size"], 5);
        assert_eq!(value["active_connections"], 1);
        assert_eq!(value["total_connections"], 3);
    }
}
