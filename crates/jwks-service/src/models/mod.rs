use serde::{Deserialize, Serialize};

/// Fixed subject placed in every issued token.
pub const FIXTURE_SUBJECT: &str = "fakeuser";

/// JWT claim set carried by issued tokens.
///
/// Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

/// JWKS response (RFC 7517)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JsonWebKey>,
}

impl Jwks {
    /// Find a published key by its key id.
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

/// JSON Web Key for an RSA public key (RFC 7517, RFC 7518 section 6.3)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String, // Key Type ("RSA")
    #[serde(rename = "use")]
    pub use_: String, // Public key use ("sig")
    pub alg: String, // Algorithm ("RS256")
    pub kid: String, // Key ID
    pub n: String,   // Modulus (base64url, unsigned big-endian)
    pub e: String,   // Public exponent (base64url, unsigned big-endian)
}
