//! Integration tests for JWKS publication
//!
//! Validates that `/.well-known/jwks.json` publishes exactly the unexpired
//! key in RFC 7517 form and nothing private.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use chrono::Utc;
use jwks_test_utils::TestJwksServer;
use reqwest::StatusCode;

/// JWKS fetched right after startup holds exactly the valid key.
#[tokio::test]
async fn test_jwks_returns_single_valid_key() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestJwksServer::spawn().await?;
    let now = Utc::now();
    let valid_kid = server.registry().select_by_validity(false, now)?.kid().to_string();
    let expired_kid = server.registry().select_by_validity(true, now)?.kid().to_string();

    // Act
    let jwks = server.fetch_jwks().await?;

    // Assert
    assert_eq!(jwks.keys.len(), 1, "Only the valid key should be published");
    assert_eq!(jwks.keys[0].kid, valid_kid);
    assert!(
        jwks.find(&expired_kid).is_none(),
        "Expired key must never be published"
    );

    Ok(())
}

/// Response is JSON with the RFC 7517 member names and no private members.
#[tokio::test]
async fn test_jwks_document_shape() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/.well-known/jwks.json", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str()?,
        "application/json"
    );

    let body: serde_json::Value = response.json().await?;
    let keys = body["keys"].as_array().expect("keys should be an array");
    assert_eq!(keys.len(), 1);

    let key = keys[0].as_object().expect("key should be an object");
    assert_eq!(key["kty"], "RSA");
    assert_eq!(key["use"], "sig");
    assert_eq!(key["alg"], "RS256");
    assert_eq!(key["e"], "AQAB");
    assert!(key["n"].as_str().is_some_and(|n| !n.is_empty() && !n.contains('=')));

    for private_member in ["d", "p", "q", "dp", "dq", "qi"] {
        assert!(
            !key.contains_key(private_member),
            "JWK must not contain private member '{}'",
            private_member
        );
    }

    Ok(())
}

/// POST on the JWKS path is rejected with 405.
#[tokio::test]
async fn test_jwks_wrong_method_returns_405() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/.well-known/jwks.json", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

/// HEAD on the JWKS path is rejected like any other non-GET method.
#[tokio::test]
async fn test_jwks_head_returns_405() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .head(format!("{}/.well-known/jwks.json", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
