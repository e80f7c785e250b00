//! Metrics definitions for the JWKS fixture server
//!
//! All metrics follow Prometheus naming conventions:
//! - `jwks_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `validity`: 2 values (valid, expired)
//! - `status`: 2 values (success, error)
//! - `state`: 2 values (valid, expired)
//! - `endpoint`: known routes plus `/other`

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Signing is a single RSA operation; sub-millisecond to tens of ms
        .set_buckets_for_metric(
            Matcher::Prefix("jwks_token_issuance".to_string()),
            &[
                0.0005, 0.001, 0.0025, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250,
            ],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("jwks_http".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP duration buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `jwks_token_issuance_duration_seconds`, `jwks_token_issuance_total`
/// Labels: `validity`, `status`
pub fn record_token_issuance(want_expired: bool, status: &str, duration: Duration) {
    let validity = validity_label(want_expired);

    histogram!("jwks_token_issuance_duration_seconds", "validity" => validity, "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("jwks_token_issuance_total", "validity" => validity, "status" => status.to_string())
        .increment(1);
}

// ============================================================================
// Key Metrics
// ============================================================================

/// Record a JWKS fetch and the number of keys it published
///
/// Metric: `jwks_requests_total`, `jwks_published_keys`
pub fn record_jwks_request(published_keys: usize) {
    counter!("jwks_requests_total").increment(1);
    gauge!("jwks_published_keys").set(published_keys as f64);
}

/// Record registry contents at startup
///
/// Metric: `jwks_registry_keys`
/// Labels: `state`
pub fn set_registry_keys(valid: usize, expired: usize) {
    gauge!("jwks_registry_keys", "state" => "valid").set(valid as f64);
    gauge!("jwks_registry_keys", "state" => "expired").set(expired as f64);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `jwks_http_requests_total`, `jwks_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code`
///
/// Captures framework-level responses too (404, 405).
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);

    histogram!("jwks_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint
    )
    .record(duration.as_secs_f64());

    counter!("jwks_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn validity_label(want_expired: bool) -> &'static str {
    if want_expired {
        "expired"
    } else {
        "valid"
    }
}

/// Map a request path to a bounded label. Unknown paths collapse to `/other`.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/.well-known/jwks.json" => "/.well-known/jwks.json",
        "/auth" => "/auth",
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}
