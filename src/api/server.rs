use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{
    get_metrics, get_pool_stats, get_prometheus_metrics, health_check, home, not_found,
};
use crate::api::middleware::count_requests;
use crate::api::state::ApiState;
use crate::config::ServerConfig;
use crate::utils::error::{PoolsightError, Result};

/// Build the router with every endpoint behind the request-counting hooks.
pub fn build_router(state: ApiState) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/pool-stats", get(get_pool_stats))
        .route("/metrics", get(get_metrics))
        .route("/metrics/prometheus", get(get_prometheus_metrics))
        .fallback(not_found)
        .with_state(state)
        // Panics become 500s inside the counting layer, so they are tallied as errors
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(metrics, count_requests))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn start_api_server<F>(config: &ServerConfig, state: ApiState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.bind_port)
        .parse()
        .map_err(|e| PoolsightError::Config(format!("Invalid bind address: {}", e)))?;

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
