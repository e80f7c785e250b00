//! HTTP routes for the JWKS fixture server.
//!
//! Defines the Axum router and application state.

use crate::handlers::{self, auth_handler, jwks_handler};
use crate::middleware::http_metrics_middleware;
use crate::services::key_registry::KeyRegistry;
use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
///
/// The registry is fully populated before the state is built and is never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Signing keys, read-only after startup.
    pub registry: KeyRegistry,
}

/// Build the application routes.
///
/// - `/.well-known/jwks.json` (GET) - published public keys
/// - `/auth` (POST) - token issuance, `?expired` for an expired token
/// - `/health` (GET) - liveness probe
/// - `/metrics` (GET) - Prometheus scrape endpoint
///
/// Wrong methods on these paths get 405 from the method router. HEAD on the
/// JWKS path is rejected explicitly since `get` would otherwise answer it.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route(
            "/.well-known/jwks.json",
            get(jwks_handler::handle_get_jwks).head(method_not_allowed),
        )
        .route("/auth", post(auth_handler::handle_issue_token))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost, sees 404/405 too)
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}
