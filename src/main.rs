//! Recipe Recommender - HTTP entry point
//!
//! Loads the catalog, builds the recommendation service and serves it.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_recommender::catalog::{load_catalog_file, CatalogStore, LoadedCatalog};
use recipe_recommender::cache::RecommendationCache;
use recipe_recommender::classify::DietaryOracle;
use recipe_recommender::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the recommendation server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the catalog document and build the service
/// 4. Start background cache sweep task
/// 5. Serve the router until SIGINT/SIGTERM, then flush the cache snapshot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recipe Recommender");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, ttl={}h, port={}, cleanup_interval={}s",
        config.max_cache_entries, config.cache_ttl_hours, config.server_port, config.cleanup_interval
    );

    let loaded = match &config.catalog_path {
        Some(path) => load_catalog_file(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => {
            warn!("CATALOG_PATH not set, serving an empty catalog");
            LoadedCatalog {
                store: CatalogStore::new(),
                oracle: DietaryOracle::empty(),
            }
        }
    };

    let state = AppState::from_config(loaded, &config);
    let cache = state.service.cache_handle();

    let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
    info!("Background cache sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle, cache))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, aborts the sweep task and writes a final cache snapshot.
async fn shutdown_signal(
    cleanup_handle: tokio::task::JoinHandle<()>,
    cache: std::sync::Arc<RecommendationCache>,
) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
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

    cleanup_handle.abort();
    warn!("Cache sweep task aborted");

    match cache.flush() {
        Ok(()) => info!("Cache snapshot flushed"),
        Err(err) => warn!("Final cache snapshot failed: {}", err),
    }
}
