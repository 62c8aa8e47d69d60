mod attachment;
mod config;
mod controller;
mod error;
mod fallback;
mod render;
mod server;
mod submission;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use finder_common::search_api::SearchApiClient;

use config::Config;
use controller::SearchController;
use error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting formula-finder");

    let config = Config::from_env()?;
    info!(
        bind = %config.bind,
        search_url = %config.search_api.search_url(),
        timeout = ?config.search_api.timeout,
        "configuration loaded"
    );

    let client = SearchApiClient::new(config.search_api.clone()).map_err(AppError::from)?;
    let controller = Arc::new(SearchController::new(Arc::new(client)));
    let app = server::router(controller);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(AppError::from)?;
    info!(addr = %config.bind, "Formula Finder initialized");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })?;
    info!("formula-finder shut down");
    Ok(())
}
