use clap::Parser;
use monk_mode::{stats::today, AppState, Config, FileStore};
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::parse();
    if let Some(parent) = config.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let store = Arc::new(FileStore::new(&config.data_path));
    let state = AppState::new(store, config.profile_name.clone());
    match state.documents.ensure_initialized(today()).await {
        Ok(true) => info!(path = %config.data_path.display(), "seeded new document"),
        Ok(false) => info!(path = %config.data_path.display(), "document already initialized"),
        Err(err) => tracing::error!("failed to initialize document: {err}"),
    }

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, monk_mode::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
