use crate::metrics::MetricsRegistry;
use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use std::sync::Arc;

/// Request hooks wrapped around every route, the 404 fallback included.
///
/// The total is bumped before dispatch and the outcome is classified from the
/// final status code, so a handler reading the counters sees itself in
/// `requests_total` but not yet in `requests_success`/`requests_error`.
pub async fn count_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    metrics.increment_request_total();
    let response = next.run(request).await;
    metrics.record_request_outcome(response.status().as_u16());
    response
}
