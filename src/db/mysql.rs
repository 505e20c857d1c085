use super::{ConnectionSource, DbConnection, PoolStatus};
use crate::config::DatabaseConfig;
use crate::utils::error::{PoolsightError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};
use std::time::Duration;
use tracing::info;

/// MySQL connection pool backed by sqlx.
#[derive(Debug, Clone)]
pub struct MySqlConnectionSource {
    pool: MySqlPool,
    pool_name: String,
    acquire_timeout: Duration,
}

impl MySqlConnectionSource {
    /// Build the pool without connecting.
    ///
    /// Connections are opened on first checkout, so the service starts (and
    /// reports itself unhealthy) while the database is unreachable.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .charset(&config.charset);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);

        info!(
            pool = %config.pool_name,
            size = config.pool_size,
            "Created MySQL connection pool for {}@{}:{}/{}",
            config.user,
            config.host,
            config.port,
            config.name
        );

        Self {
            pool,
            pool_name: config.pool_name.clone(),
            acquire_timeout: config.acquire_timeout(),
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Close every connection and reject further checkouts.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn acquire_error(&self, err: sqlx::Error) -> PoolsightError {
        match err {
            sqlx::Error::PoolTimedOut => PoolsightError::ConnectionAcquisition(format!(
                "timed out after {:?} waiting for a pooled connection",
                self.acquire_timeout
            )),
            sqlx::Error::PoolClosed => {
                PoolsightError::ConnectionAcquisition("connection pool is closed".to_string())
            }
            other => PoolsightError::ConnectionAcquisition(other.to_string()),
        }
    }
}

#[async_trait]
impl ConnectionSource for MySqlConnectionSource {
    async fn acquire(&self) -> Result<Box<dyn DbConnection>> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| self.acquire_error(e))?;
        Ok(Box::new(MySqlDbConnection { conn }))
    }

    fn pool_status(&self) -> Result<PoolStatus> {
        if self.pool.is_closed() {
            return Err(PoolsightError::PoolIntrospection(
                "connection pool is closed".to_string(),
            ));
        }

        let total = self.pool.size();
        let idle = u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX).min(total);

        Ok(PoolStatus {
            pool_name: self.pool_name.clone(),
            configured_size: self.pool.options().get_max_connections(),
            active_connections: total - idle,
            idle_connections: idle,
            total_connections: total,
        })
    }
}

/// Checked-out MySQL connection; returns to the pool when dropped.
struct MySqlDbConnection {
    conn: PoolConnection<MySql>,
}

#[async_trait]
impl DbConnection for MySqlDbConnection {
    async fn ping(&mut self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| PoolsightError::QueryExecution(e.to_string()))?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        sqlx::query("ROLLBACK")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| PoolsightError::QueryExecution(e.to_string()))?;
        Ok(())
    }
}
