//! Integration tests for startup key generation
//!
//! Uses real key generation rather than cached fixtures, so each test pays
//! for two RSA key pairs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use jwks_service::config::DEFAULT_RSA_KEY_BITS;
use jwks_service::services::key_registry::KeyRegistry;
use jwks_test_utils::{TestJwksServer, TokenAssertions};

/// A freshly initialized registry serves the same contract as the fixtures.
#[tokio::test]
async fn test_initialized_registry_serves_fixture_contract() -> Result<(), anyhow::Error> {
    // Arrange
    let now = Utc::now();
    let registry =
        tokio::task::spawn_blocking(move || KeyRegistry::initialize(DEFAULT_RSA_KEY_BITS, now))
            .await??;

    let valid = registry.select_by_validity(false, now)?.clone();
    let expired = registry.select_by_validity(true, now)?.clone();
    assert_ne!(valid.kid(), expired.kid());
    assert_eq!(valid.expires_at(), now + Duration::hours(1));
    assert_eq!(expired.expires_at(), now - Duration::hours(1));

    // Act
    let server = TestJwksServer::spawn_with_registry(registry).await?;
    let jwks = server.fetch_jwks().await?;
    let token = server.issue_token(false).await?;

    // Assert
    assert_eq!(jwks.keys.len(), 1);
    assert!(jwks.find(valid.kid()).is_some());
    token
        .assert_signed_by(valid.kid())
        .assert_verifies_against(&jwks);

    Ok(())
}
