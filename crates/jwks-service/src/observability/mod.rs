//! Observability for the JWKS fixture server
//!
//! Handlers are instrumented with `#[instrument(skip_all)]`. Span fields are
//! limited to key ids and outcomes: token strings and key material never
//! appear in logs or metric labels.

pub mod metrics;

pub use metrics::{
    init_metrics_recorder, record_http_request, record_jwks_request, record_token_issuance,
    set_registry_keys,
};
