mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod response;
mod router;
mod routes;
mod spanner;
mod state;
mod store;

use anyhow::Context;
use config::Config;
use state::AppState;
use store::NoteStoreAdapter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("notes-fn starting");

    let config = Config::from_env()?;
    config.log_startup();

    let notes = NoteStoreAdapter::init(&config).await;
    let app = app::build_router(AppState { notes });

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
