use crate::api::state::ApiState;
use crate::db::{HealthResult, PoolStatsReport};
use axum::{extract::State, response::Html};

/// GET / - HTML dashboard with the current database and pool state
pub async fn home(State(state): State<ApiState>) -> Html<String> {
    let probe = state.prober.check_health().await;
    let pool = state.pool_reporter.pool_stats();
    Html(render_dashboard(&probe, &pool))
}

pub fn render_dashboard(probe: &HealthResult, pool: &PoolStatsReport) -> String {
    let pool_line = match pool {
        PoolStatsReport::Available(status) => format!(
            "{} connections ({} active, {} idle)",
            status.configured_size, status.active_connections, status.idle_connections
        ),
        PoolStatsReport::Unavailable { error } => format!("unavailable: {}", escape_html(error)),
    };
    let banner = if probe.healthy { "#e7f3ff" } else { "#ffe7e7" };

    format!(
        r#"<html>
<head><title>Poolsight</title></head>
<body style="font-family: Arial; margin: 40px;">
    <h1>Poolsight</h1>
    <div style="background:{banner};padding:10px;border-radius:5px;">
        <strong>Database:</strong> {message}<br>
        <strong>Connection Pool:</strong> {pool_line}
    </div>
    <button onclick="window.open('/health')">Health Check</button>
    <button onclick="window.open('/pool-stats')">Pool Stats</button>
    <button onclick="window.open('/metrics')">Metrics</button>
</body>
</html>
"#,
        banner = banner,
        message = escape_html(&probe.message),
        pool_line = pool_line,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
