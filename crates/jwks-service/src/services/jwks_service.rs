use crate::models::Jwks;
use crate::services::key_registry::KeyRegistry;
use chrono::{DateTime, Utc};

/// Get JWKS (JSON Web Key Set) for public key distribution
///
/// Returns the public half of every key unexpired at `now` in RFC 7517
/// format. Expired keys and private material are never included.
pub fn publish_jwks(registry: &KeyRegistry, now: DateTime<Utc>) -> Jwks {
    Jwks {
        keys: registry.list_unexpired(now).map(|key| key.to_jwk()).collect(),
    }
}
