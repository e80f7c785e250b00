//! Integration tests for operational endpoints

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jwks_test_utils::TestJwksServer;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

/// The metrics endpoint responds in Prometheus text format once traffic
/// has been served.
#[tokio::test]
async fn test_metrics_endpoint_available() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;
    server.issue_token(false).await?;

    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_path_returns_404() -> Result<(), anyhow::Error> {
    let server = TestJwksServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/.well-known/openid-configuration", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
