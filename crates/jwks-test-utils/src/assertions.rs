//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for issued tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jwks_service::crypto::verify_jwt;
use jwks_service::models::{Claims, Jwks};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
    #[serde(default)]
    pub kid: Option<String>,
}

fn segment(token: &str, index: usize) -> Vec<u8> {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT is missing segment {}", index));
    URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64url decode JWT segment {}: {}", index, e))
}

fn header(token: &str) -> JwtHeader {
    serde_json::from_slice(&segment(token, 0)).expect("Failed to parse JWT header JSON")
}

/// Decode the claims of a token without verifying its signature.
pub fn unverified_claims(token: &str) -> Claims {
    serde_json::from_slice(&segment(token, 1)).expect("Failed to parse JWT claims JSON")
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_signed_by(valid_kid)
///     .assert_lifetime(3600)
///     .assert_verifies_against(&jwks);
/// ```
pub trait TokenAssertions {
    /// Assert compact JWS shape with an RS256 JWT header and parseable claims
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the header `kid` is the given key id
    fn assert_signed_by(&self, key_id: &str) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert `exp - iat` equals `seconds` (negative for already-expired tokens)
    fn assert_lifetime(&self, seconds: i64) -> &Self;

    /// Assert the signature verifies against the JWKS entry named by `kid`
    fn assert_verifies_against(&self, jwks: &Jwks) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        self.as_str().assert_valid_jwt();
        self
    }

    fn assert_signed_by(&self, key_id: &str) -> &Self {
        self.as_str().assert_signed_by(key_id);
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        self.as_str().assert_for_subject(subject);
        self
    }

    fn assert_lifetime(&self, seconds: i64) -> &Self {
        self.as_str().assert_lifetime(seconds);
        self
    }

    fn assert_verifies_against(&self, jwks: &Jwks) -> &Self {
        self.as_str().assert_verifies_against(jwks);
        self
    }
}

impl TokenAssertions for str {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );
        assert!(
            parts.iter().all(|p| !p.is_empty() && !p.contains('=')),
            "JWT segments must be non-empty unpadded base64url"
        );

        let header = header(self);
        assert_eq!(header.alg, "RS256", "Expected RS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _ = unverified_claims(self);

        self
    }

    fn assert_signed_by(&self, key_id: &str) -> &Self {
        let header = header(self);
        assert_eq!(
            header.kid.as_deref(),
            Some(key_id),
            "Token was not signed by key '{}'",
            key_id
        );
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = unverified_claims(self);
        assert_eq!(claims.sub, subject, "Token subject mismatch");
        self
    }

    fn assert_lifetime(&self, seconds: i64) -> &Self {
        let claims = unverified_claims(self);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Expected exp - iat == {} (iat={}, exp={})",
            seconds,
            claims.iat,
            claims.exp
        );
        self
    }

    fn assert_verifies_against(&self, jwks: &Jwks) -> &Self {
        let kid = header(self).kid.expect("Token header has no kid");
        let jwk = jwks
            .find(&kid)
            .unwrap_or_else(|| panic!("JWKS has no key with kid '{}'", kid));

        if let Err(e) = verify_jwt(self, jwk) {
            panic!("Token failed verification against JWKS key '{}': {}", kid, e);
        }
        self
    }
}
