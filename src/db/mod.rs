pub mod accessor;
pub mod health;
pub mod mysql;
pub mod status;

pub use accessor::ConnectionAccessor;
pub use health::{HealthProber, HealthResult};
pub use mysql::MySqlConnectionSource;
pub use status::{PoolStatsReport, PoolStatusReporter};

use crate::utils::error::{PoolsightError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A connection checked out of a pool.
///
/// Dropping the value hands the connection back to its pool, so ownership
/// guarantees it is released exactly once.
#[async_trait]
pub trait DbConnection: Send {
    /// Run the liveness statement (`SELECT 1`) and discard the result.
    async fn ping(&mut self) -> Result<()>;

    /// Roll back whatever the connection may have left open.
    async fn rollback(&mut self) -> Result<()>;
}

/// Pool abstraction the accessor checks connections out of.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn DbConnection>>;

    /// Current pool occupancy.
    fn pool_status(&self) -> Result<PoolStatus> {
        Err(PoolsightError::PoolIntrospection(
            "pool does not expose statistics".to_string(),
        ))
    }
}

/// Pool occupancy read at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub pool_name: String,
    pub configured_size: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
}
