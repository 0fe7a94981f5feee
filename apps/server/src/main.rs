//! Signpost - web server entry point

use std::sync::Arc;

use anyhow::Context;
use signpost::{
    api::create_router, config::Config, engine::HttpSearchBackend, logging, state::AppState,
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first to get logging settings
    let config = Config::load().context("Failed to load configuration")?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Signpost");

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    tracing::info!(
        engine_url = %config.engine.url,
        index = %config.engine.index,
        listen_addr = %addr,
        "Configuration loaded"
    );

    let store = match &config.directory.seed_path {
        Some(path) => {
            let store = MemoryStore::from_seed_file(path)
                .with_context(|| format!("Failed to load directory seed from {}", path.display()))?;
            let organisations = store.organisation_count().await;
            tracing::info!(seed = %path.display(), organisations, "Directory seed loaded");
            store
        }
        None => MemoryStore::new(),
    };

    let backend =
        HttpSearchBackend::new(&config.engine).context("Failed to initialize search backend")?;

    let state = AppState::new(config, Arc::new(store), Arc::new(backend))
        .context("Failed to initialize application state")?;

    let app = create_router(state);

    tracing::info!("Signpost listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Search endpoint: http://{}/api/search", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
/// Docker sends SIGTERM, while Ctrl+C sends SIGINT
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");
    let sigint = tokio::signal::ctrl_c();

    tokio::select! {
        _ = sigint => {
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
        _ = sigterm.recv() => {
            tracing::info!("SIGTERM received, starting graceful shutdown...");
        }
    }
}

/// Wait for shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
