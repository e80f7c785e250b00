use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Default listen address, matching the port fixture clients expect.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default RSA modulus size in bits.
pub const DEFAULT_RSA_KEY_BITS: usize = 2048;

/// Minimum accepted RSA modulus size. RS256 verifiers commonly refuse
/// anything smaller.
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// Maximum accepted RSA modulus size. Generation time grows steeply past this.
pub const MAX_RSA_KEY_BITS: usize = 4096;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub rsa_key_bits: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBindAddress { value: String, reason: String },

    #[error("Invalid RSA_KEY_BITS: {0}")]
    InvalidKeyBits(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            rsa_key_bits: DEFAULT_RSA_KEY_BITS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address_raw = vars
            .get("BIND_ADDRESS")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND_ADDRESS);

        let bind_address: SocketAddr =
            bind_address_raw
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                    value: bind_address_raw.to_string(),
                    reason: e.to_string(),
                })?;

        let rsa_key_bits = match vars.get("RSA_KEY_BITS") {
            Some(raw) => {
                let bits: usize = raw.parse().map_err(|e| {
                    ConfigError::InvalidKeyBits(format!("'{}' is not an integer: {}", raw, e))
                })?;

                if !(MIN_RSA_KEY_BITS..=MAX_RSA_KEY_BITS).contains(&bits) {
                    return Err(ConfigError::InvalidKeyBits(format!(
                        "{} is outside the allowed range {}-{}",
                        bits, MIN_RSA_KEY_BITS, MAX_RSA_KEY_BITS
                    )));
                }

                bits
            }
            None => DEFAULT_RSA_KEY_BITS,
        };

        Ok(Config {
            bind_address,
            rsa_key_bits,
        })
    }
}
