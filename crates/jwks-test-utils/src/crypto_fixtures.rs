//! Cached RSA fixtures for testing
//!
//! RSA key generation is too slow to repeat in every test, so a small pool
//! of 2048-bit keys is generated on first use and shared for the rest of
//! the test process. Key ids are still fresh per `SigningKey`.

use chrono::{DateTime, Duration, Utc};
use jwks_service::crypto::generate_rsa_private_key;
use jwks_service::services::key_registry::{KeyRegistry, SigningKey};
use rsa::RsaPrivateKey;
use std::sync::OnceLock;

/// Number of distinct cached private keys.
pub const FIXTURE_KEY_COUNT: usize = 3;

static PRIVATE_KEYS: OnceLock<Vec<RsaPrivateKey>> = OnceLock::new();

/// Get cached RSA private key number `slot` (0..FIXTURE_KEY_COUNT).
///
/// The same slot always returns the same key material within a process.
pub fn test_private_key(slot: usize) -> RsaPrivateKey {
    PRIVATE_KEYS
        .get_or_init(|| {
            (0..FIXTURE_KEY_COUNT)
                .map(|_| generate_rsa_private_key(2048).expect("Failed to generate test RSA key"))
                .collect()
        })
        .get(slot)
        .cloned()
        .unwrap_or_else(|| panic!("Fixture key slot {} out of range", slot))
}

/// Build a signing key from cached material with the given expiry.
pub fn test_signing_key(slot: usize, expires_at: DateTime<Utc>) -> SigningKey {
    SigningKey::from_private_key(test_private_key(slot), expires_at)
        .expect("Failed to build test signing key")
}

/// Registry shaped like the startup fixture: slot 0 expires an hour after
/// `now`, slot 1 expired an hour before.
pub fn fixture_registry(now: DateTime<Utc>) -> KeyRegistry {
    KeyRegistry::from_keys(vec![
        test_signing_key(0, now + Duration::hours(1)),
        test_signing_key(1, now - Duration::hours(1)),
    ])
    .expect("Failed to build fixture registry")
}

/// Registry holding only an unexpired key, for exercising the no-match path.
pub fn valid_only_registry(now: DateTime<Utc>) -> KeyRegistry {
    KeyRegistry::from_keys(vec![test_signing_key(0, now + Duration::hours(1))])
        .expect("Failed to build valid-only registry")
}
