use super::{ConnectionSource, DbConnection, PoolStatus};
use crate::metrics::MetricsRegistry;
use crate::utils::error::Result;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, trace, warn};

/// Scoped access to pooled connections.
///
/// Each call to [`with_connection`](Self::with_connection) checks out one
/// connection, lends it to a single unit of work and hands it back to the pool
/// on every exit path: success, error, panic or cancellation of the caller.
pub struct ConnectionAccessor {
    source: Arc<dyn ConnectionSource>,
    metrics: Arc<MetricsRegistry>,
    checked_out: AtomicUsize,
}

impl ConnectionAccessor {
    pub fn new(source: Arc<dyn ConnectionSource>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            source,
            metrics,
            checked_out: AtomicUsize::new(0),
        }
    }

    /// Run `work` against a pooled connection.
    ///
    /// Failures to acquire and failures of `work` both count as database errors
    /// and are returned to the caller. When `work` fails the connection is rolled
    /// back before it is released. A panic in `work`, or dropping the returned
    /// future before it completes, also counts as an error.
    pub async fn with_connection<T, F>(&self, work: F) -> Result<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut dyn DbConnection) -> BoxFuture<'c, Result<T>> + Send,
    {
        self.metrics.increment_db_total();

        let mut conn = match self.source.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                self.metrics.record_db_outcome(false);
                error!(error = %e, "Database connection error");
                return Err(e);
            }
        };
        let _checkout = Checkout::begin(&self.checked_out);
        let pending = PendingOutcome::new(&self.metrics);
        trace!("Checked out pooled connection");

        let outcome = work(&mut *conn).await;
        match outcome {
            Ok(value) => {
                pending.record(true);
                Ok(value)
            }
            Err(e) => {
                pending.record(false);
                error!(error = %e, "Database connection error");
                if let Err(rollback_err) = conn.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed work also failed");
                }
                Err(e)
            }
        }
        // `_checkout` drops here, then `conn` goes back to the pool.
    }

    /// Connections currently lent out by this accessor.
    pub fn checked_out(&self) -> usize {
        self.checked_out.load(Ordering::Acquire)
    }

    pub fn pool_status(&self) -> Result<PoolStatus> {
        self.source.pool_status()
    }
}

/// Keeps `checked_out` in step with live checkouts, including unwinding paths.
struct Checkout<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> Checkout<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self { counter }
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Records a database error on drop unless an outcome was recorded first.
struct PendingOutcome<'a> {
    metrics: &'a MetricsRegistry,
    recorded: bool,
}

impl<'a> PendingOutcome<'a> {
    fn new(metrics: &'a MetricsRegistry) -> Self {
        Self {
            metrics,
            recorded: false,
        }
    }

    fn record(mut self, success: bool) {
        self.metrics.record_db_outcome(success);
        self.recorded = true;
    }
}

impl Drop for PendingOutcome<'_> {
    fn drop(&mut self) {
        if !self.recorded {
            warn!("Connection work ended without an outcome, counting it as an error");
            self.metrics.record_db_outcome(false);
        }
    }
}
