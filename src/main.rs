//! Instrumented Cache - inspection server
//!
//! Serves the instrumentation layer over HTTP so external tooling can store
//! payloads, read call counters and replay call history.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use instrumented_cache::api::{create_router, AppState};
use instrumented_cache::config::{Config, StoreBackend};
use instrumented_cache::store::{MemoryStore, RedisStore, SharedStore};
use instrumented_cache::tasks::spawn_cleanup_task;

/// Main entry point for the inspection server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured store (starting TTL cleanup for the memory store)
/// 4. Build application state, which flushes the store
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instrumented_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Instrumented Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, page_ttl={}s, port={}, fetch_timeout={}s",
        config.store_backend, config.page_ttl, config.server_port, config.fetch_timeout
    );

    let (store, cleanup_handle): (SharedStore, Option<JoinHandle<()>>) =
        match config.store_backend {
            StoreBackend::Memory => {
                let store = MemoryStore::new();
                let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
                let store: SharedStore = Arc::new(store);
                (store, Some(handle))
            }
            StoreBackend::Redis => {
                let store = RedisStore::connect(&config.redis_url)
                    .await
                    .with_context(|| format!("connecting to {}", config.redis_url))?;
                let store: SharedStore = Arc::new(store);
                (store, None)
            }
        };

    let state = AppState::from_config(store, &config)
        .await
        .context("initializing instrumentation state")?;
    info!("Store flushed and ready");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
