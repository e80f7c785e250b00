use crate::errors::JwksError;
use crate::models::{Claims, JsonWebKey};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::instrument;

/// Maximum accepted JWT size in bytes (8KB).
///
/// Checked before any base64 decoding or signature work. An RS256 token with
/// a 4096-bit key and the fixture claims is well under 1KB.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// JWA name of the only supported signing algorithm.
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Generate an RSA private key of `bits` bits using the thread-local CSPRNG.
#[instrument(skip_all, fields(bits = bits))]
pub fn generate_rsa_private_key(bits: usize) -> Result<RsaPrivateKey, JwksError> {
    RsaPrivateKey::new(&mut rand::thread_rng(), bits)
        .map_err(|e| JwksError::KeyGeneration(format!("RSA keypair generation failed: {}", e)))
}

/// Build the jsonwebtoken signing key from an RSA private key.
///
/// The key is DER-encoded once so per-request signing does not re-serialize it.
pub fn encoding_key(private_key: &RsaPrivateKey) -> Result<EncodingKey, JwksError> {
    let der = private_key
        .to_pkcs1_der()
        .map_err(|e| JwksError::KeyGeneration(format!("PKCS#1 encoding failed: {}", e)))?;

    Ok(EncodingKey::from_rsa_der(der.as_bytes()))
}

/// Encode the modulus and public exponent as JWK `n` and `e` values.
///
/// Both are minimal unsigned big-endian byte strings, base64url without padding.
pub fn public_jwk_components(public_key: &RsaPublicKey) -> (String, String) {
    let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
    let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());
    (n, e)
}

/// Sign claims with RS256, placing `key_id` in the header as `kid`.
#[instrument(skip_all)]
pub fn sign_jwt(
    claims: &Claims,
    encoding_key: &EncodingKey,
    key_id: &str,
) -> Result<String, JwksError> {
    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    header.kid = Some(key_id.to_string());

    encode(&header, claims, encoding_key)
        .map_err(|e| JwksError::Signing(format!("JWT signing operation failed: {}", e)))
}

/// Extract the `kid` from a JWT header without verifying the signature.
///
/// Used to pick the JWKS entry to verify against. Returns `None` for
/// oversized or malformed tokens and headers without a string `kid`.
pub fn extract_jwt_kid(token: &str) -> Option<String> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        return None;
    }

    let mut parts = token.split('.');
    let header_b64 = parts.next()?;
    // Exactly three segments
    if parts.next().is_none() || parts.next().is_none() || parts.next().is_some() {
        return None;
    }

    let header_bytes = URL_SAFE_NO_PAD.decode(header_b64).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&header_bytes).ok()?;

    header.get("kid")?.as_str().map(|s| s.to_string())
}

/// Verify an RS256 token against a published JWK.
///
/// Validates the signature and `exp` with no leeway, so a token whose `exp`
/// has passed is always rejected.
#[instrument(skip_all)]
pub fn verify_jwt(token: &str, jwk: &JsonWebKey) -> Result<Claims, JwksError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "jwks.crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwksError::InvalidToken(format!(
            "token exceeds {} bytes",
            MAX_JWT_SIZE_BYTES
        )));
    }

    if jwk.kty != "RSA" || jwk.alg != SIGNING_ALGORITHM {
        return Err(JwksError::InvalidToken(format!(
            "unsupported key type {}/{}",
            jwk.kty, jwk.alg
        )));
    }

    let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| JwksError::InvalidToken(format!("malformed public key: {}", e)))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "jwks.crypto", error = %e, "Token verification failed");
        JwksError::InvalidToken(e.to_string())
    })?;

    Ok(token_data.claims)
}

/// Cached RSA keys for unit tests. Generating 2048-bit keys per test is slow.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn test_private_key(slot: usize) -> RsaPrivateKey {
    use std::sync::OnceLock;

    static KEYS: OnceLock<Vec<RsaPrivateKey>> = OnceLock::new();

    KEYS.get_or_init(|| {
        (0..3)
            .map(|_| generate_rsa_private_key(2048).expect("test key generation should succeed"))
            .collect()
    })
    .get(slot)
    .cloned()
    .expect("test key slot out of range")
}
