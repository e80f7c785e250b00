use crate::crypto;
use crate::errors::JwksError;
use crate::models::{Claims, FIXTURE_SUBJECT};
use crate::services::key_registry::KeyRegistry;
use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

/// Offset between `iat` and `exp` for issued tokens, in seconds.
pub const TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Build the fixture claim set for a token issued at `now`.
///
/// Expired tokens get `exp = now - 1h`: already past at issuance.
pub fn fixture_claims(want_expired: bool, now: DateTime<Utc>) -> Claims {
    let lifetime = Duration::seconds(TOKEN_LIFETIME_SECONDS);
    let expires_at = if want_expired {
        now - lifetime
    } else {
        now + lifetime
    };

    Claims {
        sub: FIXTURE_SUBJECT.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    }
}

/// Issue a compact RS256 token signed by a key of the requested validity.
///
/// Valid tokens are signed with the unexpired key; expired tokens with the
/// expired key. `NoMatchingKey` is returned rather than substituting a key
/// from the other class.
#[instrument(skip_all, fields(expired = want_expired, kid))]
pub fn issue_token(
    registry: &KeyRegistry,
    want_expired: bool,
    now: DateTime<Utc>,
) -> Result<String, JwksError> {
    let key = registry.select_by_validity(want_expired, now)?;
    tracing::Span::current().record("kid", key.kid());

    let claims = fixture_claims(want_expired, now);
    let token = crypto::sign_jwt(&claims, key.encoding_key(), key.kid())?;

    tracing::debug!(
        target: "jwks.token",
        kid = %key.kid(),
        exp = claims.exp,
        "Token issued"
    );

    Ok(token)
}
