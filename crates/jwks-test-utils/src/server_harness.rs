//! Test server harness for E2E testing
//!
//! Provides TestJwksServer for spawning real server instances in tests.

use crate::crypto_fixtures::fixture_registry;
use chrono::Utc;
use jwks_service::models::Jwks;
use jwks_service::routes::{self, AppState};
use jwks_service::services::key_registry::KeyRegistry;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Shared metrics handle for test servers.
///
/// The global recorder can only be installed once per process; later callers
/// reuse the first handle, and if another recorder was installed first a
/// detached recorder is used instead.
pub fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            routes::init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning the JWKS server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_jwks_e2e() -> Result<()> {
///     let server = TestJwksServer::spawn().await?;
///     let jwks = server.fetch_jwks().await?;
///     assert_eq!(jwks.keys.len(), 1);
///     Ok(())
/// }
/// ```
pub struct TestJwksServer {
    addr: SocketAddr,
    registry: KeyRegistry,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestJwksServer {
    /// Spawn a server with the standard fixture registry (one valid key,
    /// one expired key) built from cached key material.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_registry(fixture_registry(Utc::now())).await
    }

    /// Spawn a server with the given registry
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs
    /// in the background until the harness is dropped.
    pub async fn spawn_with_registry(registry: KeyRegistry) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            registry: registry.clone(),
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state, test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            registry,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the registry the server was started with
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Get a shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch and parse the published key set
    pub async fn fetch_jwks(&self) -> Result<Jwks, anyhow::Error> {
        let jwks = self
            .client
            .get(format!("{}/.well-known/jwks.json", self.url()))
            .send()
            .await?
            .error_for_status()?
            .json::<Jwks>()
            .await?;
        Ok(jwks)
    }

    /// Request a token, optionally with the `expired` flag
    pub async fn issue_token(&self, expired: bool) -> Result<String, anyhow::Error> {
        let url = if expired {
            format!("{}/auth?expired", self.url())
        } else {
            format!("{}/auth", self.url())
        };

        let token = self
            .client
            .post(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(token)
    }
}

impl Drop for TestJwksServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
