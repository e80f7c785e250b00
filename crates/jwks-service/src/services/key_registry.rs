//! In-memory signing key registry.
//!
//! The registry is built once before the listener opens and never mutated
//! afterwards, so handlers share it through `Arc` without locking. Adding
//! rotation would require reintroducing synchronization here.

use crate::crypto;
use crate::errors::JwksError;
use crate::models::JsonWebKey;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::EncodingKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::collections::HashSet;
use std::fmt;
use tracing::instrument;
use uuid::Uuid;

/// Offset applied to `now` for the fixture keys' expiry (one ahead, one behind).
pub const FIXTURE_KEY_LIFETIME_SECONDS: i64 = 3600;

/// An RSA signing key with its key id and expiry.
///
/// Private material is only reachable inside the crate, and `Debug` redacts it.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    private_key: RsaPrivateKey,
    encoding_key: EncodingKey,
    expires_at: DateTime<Utc>,
}

impl SigningKey {
    /// Generate a fresh key pair with a new random key id.
    pub fn generate(bits: usize, expires_at: DateTime<Utc>) -> Result<Self, JwksError> {
        let private_key = crypto::generate_rsa_private_key(bits)?;
        Self::from_private_key(private_key, expires_at)
    }

    /// Wrap existing key material, assigning a new random key id.
    pub fn from_private_key(
        private_key: RsaPrivateKey,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, JwksError> {
        let encoding_key = crypto::encoding_key(&private_key)?;

        Ok(Self {
            kid: Uuid::new_v4().to_string(),
            private_key,
            encoding_key,
            expires_at,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A key is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// Public half of the key in JWKS form.
    pub fn to_jwk(&self) -> JsonWebKey {
        let (n, e) = crypto::public_jwk_components(&self.public_key());

        JsonWebKey {
            kty: "RSA".to_string(),
            use_: "sig".to_string(),
            alg: crypto::SIGNING_ALGORITHM.to_string(),
            kid: self.kid.clone(),
            n,
            e,
        }
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("private_key", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Immutable set of signing keys, in generation order.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    keys: Vec<SigningKey>,
}

impl KeyRegistry {
    /// Build the fixture registry: one key valid for another hour and one
    /// that expired an hour ago.
    ///
    /// Key generation is CPU-bound; callers on an async runtime should run
    /// this on the blocking pool.
    #[instrument(skip_all, fields(bits = bits))]
    pub fn initialize(bits: usize, now: DateTime<Utc>) -> Result<Self, JwksError> {
        let lifetime = Duration::seconds(FIXTURE_KEY_LIFETIME_SECONDS);

        let valid_key = SigningKey::generate(bits, now + lifetime)?;
        let expired_key = SigningKey::generate(bits, now - lifetime)?;

        tracing::info!(
            target: "jwks.keys",
            valid_kid = %valid_key.kid(),
            expired_kid = %expired_key.kid(),
            "Fixture signing keys generated"
        );

        Self::from_keys(vec![valid_key, expired_key])
    }

    /// Build a registry from keys in generation order (oldest first).
    pub fn from_keys(keys: Vec<SigningKey>) -> Result<Self, JwksError> {
        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            if !seen.insert(key.kid()) {
                return Err(JwksError::DuplicateKeyId(key.kid().to_string()));
            }
        }

        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid() == kid)
    }

    /// Keys whose expiry is strictly after `now`. Callers must not rely on order.
    pub fn list_unexpired(&self, now: DateTime<Utc>) -> impl Iterator<Item = &SigningKey> + '_ {
        self.keys.iter().filter(move |key| !key.is_expired_at(now))
    }

    /// Pick a key in the requested validity class.
    ///
    /// With more than one candidate the most recently generated key wins.
    /// Never falls back to a key of the other class.
    pub fn select_by_validity(
        &self,
        want_expired: bool,
        now: DateTime<Utc>,
    ) -> Result<&SigningKey, JwksError> {
        self.keys
            .iter()
            .rev()
            .find(|key| key.is_expired_at(now) == want_expired)
            .ok_or(JwksError::NoMatchingKey {
                expired: want_expired,
            })
    }
}
