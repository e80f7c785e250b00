//! Integration tests for token issuance
//!
//! Exercises `/auth` end to end: valid tokens verify against the published
//! key set, expired tokens carry a past `exp` and are refused by a verifier.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use chrono::Utc;
use jwks_service::crypto::{extract_jwt_kid, verify_jwt};
use jwks_service::errors::JwksError;
use jwks_test_utils::{unverified_claims, valid_only_registry, TestJwksServer, TokenAssertions};
use reqwest::StatusCode;

// ============================================================================
// Valid Tokens
// ============================================================================

/// POST /auth returns a plain-text token verifiable against the JWKS.
#[tokio::test]
async fn test_auth_returns_token_verifiable_against_jwks() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestJwksServer::spawn().await?;
    let valid_kid = server
        .registry()
        .select_by_validity(false, Utc::now())?
        .kid()
        .to_string();

    // Act
    let response = server
        .client()
        .post(format!("{}/auth", server.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"].to_str()?, "text/plain");

    let token = response.text().await?;
    let jwks = server.fetch_jwks().await?;

    token
        .assert_valid_jwt()
        .assert_signed_by(&valid_kid)
        .assert_for_subject("fakeuser")
        .assert_lifetime(3600)
        .assert_verifies_against(&jwks);

    Ok(())
}

/// The valid token's `iat` is the issuance time.
#[tokio::test]
async fn test_valid_token_iat_is_current() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let before = Utc::now().timestamp();
    let token = server.issue_token(false).await?;
    let after = Utc::now().timestamp();

    let claims = unverified_claims(&token);
    assert!(
        (before..=after).contains(&claims.iat),
        "iat {} should fall within [{}, {}]",
        claims.iat,
        before,
        after
    );

    Ok(())
}

// ============================================================================
// Expired Tokens
// ============================================================================

/// POST /auth?expired returns a token whose exp is already in the past.
#[tokio::test]
async fn test_auth_expired_returns_past_exp() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestJwksServer::spawn().await?;
    let expired_key = server
        .registry()
        .select_by_validity(true, Utc::now())?
        .clone();

    // Act
    let token = server.issue_token(true).await?;

    // Assert
    token
        .assert_valid_jwt()
        .assert_signed_by(expired_key.kid())
        .assert_for_subject("fakeuser")
        .assert_lifetime(-3600);

    let claims = unverified_claims(&token);
    assert!(claims.exp < Utc::now().timestamp(), "exp should be in the past");

    // A verifier holding the expired key's public half rejects it as expired
    let result = verify_jwt(&token, &expired_key.to_jwk());
    assert!(
        matches!(result, Err(JwksError::InvalidToken(ref msg)) if msg.contains("ExpiredSignature")),
        "Expected expiry rejection, got {:?}",
        result
    );

    Ok(())
}

/// Expired tokens reference a kid absent from the published key set.
#[tokio::test]
async fn test_expired_token_kid_not_published() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let token = server.issue_token(true).await?;
    let jwks = server.fetch_jwks().await?;

    let kid = token_kid(&token);
    assert!(jwks.find(&kid).is_none());

    Ok(())
}

fn token_kid(token: &str) -> String {
    extract_jwt_kid(token).expect("token should carry a kid")
}

// ============================================================================
// Error Paths
// ============================================================================

/// GET on /auth is rejected with 405.
#[tokio::test]
async fn test_auth_wrong_method_returns_405() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/auth", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

/// With no expired key in the registry, /auth?expired is a 500, never a
/// token signed by the valid key.
#[tokio::test]
async fn test_auth_without_matching_key_returns_500() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn_with_registry(valid_only_registry(Utc::now())).await?;

    let response = server
        .client()
        .post(format!("{}/auth?expired", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["content-type"].to_str()?, "text/plain");
    assert_eq!(response.text().await?, "No suitable key found");

    // The valid path still works
    let token = server.issue_token(false).await?;
    token.assert_verifies_against(&server.fetch_jwks().await?);

    Ok(())
}

/// Concurrent requests against the shared read-only registry all succeed.
#[tokio::test]
async fn test_concurrent_issuance() -> Result<(), anyhow::Error> {
    let server = std::sync::Arc::new(TestJwksServer::spawn().await?);
    let jwks = server.fetch_jwks().await?;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let server = server.clone();
        tasks.push(tokio::spawn(async move { server.issue_token(i % 2 == 0).await }));
    }

    let mut valid = 0;
    for task in tasks {
        let token = task.await??;
        if jwks.find(&token_kid(&token)).is_some() {
            token.assert_verifies_against(&jwks);
            valid += 1;
        }
    }
    assert_eq!(valid, 8);

    Ok(())
}
