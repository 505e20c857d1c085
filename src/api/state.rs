use crate::db::{ConnectionAccessor, ConnectionSource, HealthProber, PoolStatusReporter};
use crate::metrics::MetricsRegistry;
use std::sync::Arc;

/// API state containing shared resources
#[derive(Clone)]
pub struct ApiState {
    pub metrics: Arc<MetricsRegistry>,
    pub accessor: Arc<ConnectionAccessor>,
    pub prober: HealthProber,
    pub pool_reporter: PoolStatusReporter,
}

impl ApiState {
    /// Wire the accessor, prober and reporter around one pool and one registry.
    pub fn new(source: Arc<dyn ConnectionSource>, metrics: Arc<MetricsRegistry>) -> Self {
        let accessor = Arc::new(ConnectionAccessor::new(source, metrics.clone()));

        Self {
            metrics,
            prober: HealthProber::new(accessor.clone()),
            pool_reporter: PoolStatusReporter::new(accessor.clone()),
            accessor,
        }
    }
}
