//! Climate HTTP Server Binary
//!
//! Builds the measurement store, sets up the HTTP router and serves requests.
//!
//! # Usage
//!
//! ```bash
//! # Serve the Hawaii dataset from its default location
//! cargo run --bin climate-server
//!
//! # Serve another database file
//! DATABASE_URL=/data/hawaii.sqlite cargo run --bin climate-server
//!
//! # Configure the store from a TOML file
//! CLIMATE_CONFIG=climate.toml cargo run --bin climate-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `CLIMATE_CONFIG`: Path to a store configuration file. When unset, the
//!   first `climate.toml` in `.`, `backend/` or `..` is used; with no file the
//!   store is configured from the variables below.
//! - `REPOSITORY_TYPE`: `sqlite` (default) or `local`
//! - `DATABASE_URL`: SQLite database path (default: Resources/hawaii.sqlite)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use climate_api::db::RepositoryFactory;
use climate_api::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting climate HTTP server");

    let repository = RepositoryFactory::from_config_or_env(Path::new("."))
        .await
        .context("Failed to initialize measurement store")?;
    info!("Repository initialized successfully");

    let app = create_router(AppState::new(repository));

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
