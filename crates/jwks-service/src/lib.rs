//! JWKS Fixture Server Library
//!
//! A test double for an identity provider: publishes a JSON Web Key Set and
//! issues RS256 tokens signed by either a valid or an already-expired key.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - RSA key generation, JWT signing and verification
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Claims and JWKS data models
//! - `services` - Key registry, token issuance, JWKS publication

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
