use crate::models::Jwks;
use crate::observability::metrics::record_jwks_request;
use crate::routes::AppState;
use crate::services::jwks_service;
use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

/// Handle JWKS request
///
/// GET /.well-known/jwks.json
///
/// Returns the public keys that are unexpired at request time in JWKS
/// format (RFC 7517).
#[instrument(name = "jwks.keys.get", skip_all, fields(key_count))]
pub async fn handle_get_jwks(State(state): State<Arc<AppState>>) -> Json<Jwks> {
    let jwks = jwks_service::publish_jwks(&state.registry, Utc::now());

    tracing::Span::current().record("key_count", jwks.keys.len());
    record_jwks_request(jwks.keys.len());

    Json(jwks)
}
