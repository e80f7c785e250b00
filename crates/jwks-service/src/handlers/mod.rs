pub mod auth_handler;
pub mod jwks_handler;

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// Prometheus scrape endpoint
///
/// GET /metrics
#[tracing::instrument(skip_all, name = "jwks.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
