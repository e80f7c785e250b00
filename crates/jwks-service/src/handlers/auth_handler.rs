use crate::errors::JwksError;
use crate::observability::metrics::record_token_issuance;
use crate::routes::AppState;
use crate::services::token_service;
use axum::{
    extract::{Query, State},
    http::header::{HeaderName, CONTENT_TYPE},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Query flag selecting an expired token. Only its presence matters.
pub const EXPIRED_FLAG: &str = "expired";

/// Handle token request
///
/// POST /auth
/// POST /auth?expired
///
/// Returns a compact RS256 token as `text/plain`. With the `expired` flag the
/// token is signed by the expired key and its `exp` is already in the past.
#[instrument(name = "jwks.auth.issue", skip_all, fields(expired, status))]
pub async fn handle_issue_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<([(HeaderName, &'static str); 1], String), JwksError> {
    let start = Instant::now();
    let want_expired = params.contains_key(EXPIRED_FLAG);
    tracing::Span::current().record("expired", want_expired);

    let result = token_service::issue_token(&state.registry, want_expired, Utc::now());

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(want_expired, status, start.elapsed());

    let token = result?;

    Ok(([(CONTENT_TYPE, "text/plain")], token))
}
