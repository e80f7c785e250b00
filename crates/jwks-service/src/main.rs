//! JWKS Fixture Server
//!
//! Serves one valid and one expired RSA signing key for exercising JWT
//! validation in client tests.

use chrono::Utc;
use jwks_service::config::Config;
use jwks_service::observability::metrics::{init_metrics_recorder, set_registry_keys};
use jwks_service::routes::{self, AppState};
use jwks_service::services::key_registry::KeyRegistry;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwks_service=debug,jwks_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JWKS fixture server");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        rsa_key_bits = config.rsa_key_bits,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    // Generate fixture keys before opening the listener. Without them the
    // server has nothing to serve, so failure aborts startup.
    info!("Generating signing keys...");
    let key_bits = config.rsa_key_bits;
    let registry = tokio::task::spawn_blocking(move || KeyRegistry::initialize(key_bits, Utc::now()))
        .await
        .map_err(|e| {
            error!("Key generation task failed: {}", e);
            e
        })?
        .map_err(|e| {
            error!("Failed to initialize signing keys: {}", e);
            e
        })?;

    let now = Utc::now();
    let valid_keys = registry.list_unexpired(now).count();
    set_registry_keys(valid_keys, registry.len().saturating_sub(valid_keys));
    info!(valid_keys, total_keys = registry.len(), "Signing keys initialized");

    let state = Arc::new(AppState { registry });
    let app = routes::build_routes(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("JWKS server running on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("JWKS server shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
