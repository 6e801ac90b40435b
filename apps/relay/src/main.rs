//! Deckrelay entry point.

mod config;

use tracing_subscriber::EnvFilter;

use deckrelay_anki_connect::Client;
use deckrelay_file_store::FileStore;
use deckrelay_server::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting deckrelay"
    );

    let config = config::Config::from_env();
    tracing::info!(
        port = config.port,
        anki_connect = %config.anki_connect_url,
        "configuration loaded"
    );

    let store = FileStore::new(config.staging_dir())?;
    tracing::info!(dir = %store.dir().display(), "staging directory ready");

    let state = AppState::new(Client::new(config.anki_connect_url.clone()), store);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("relay shut down cleanly");
    Ok(())
}

/// Resolves when ctrl-c is received.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    }
}
