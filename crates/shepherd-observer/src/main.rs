//! Observer server entry point for Server Shepherd.
//!
//! Loads configuration, initializes structured logging, and serves the
//! ingest, REST, and `WebSocket` endpoints until terminated.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shepherd_core::ShepherdConfig;
use shepherd_observer::server::{ServerConfig, start_server};
use shepherd_observer::state::AppState;

/// Application entry point.
///
/// Reads `shepherd-config.yaml` (path overridable via `SHEPHERD_CONFIG`);
/// a missing file falls back to defaults so the server runs out of the
/// box.
///
/// # Errors
///
/// Returns an error if the configuration file is unreadable or the server
/// cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("shepherd-observer starting");

    let config_path =
        std::env::var("SHEPHERD_CONFIG").unwrap_or_else(|_| String::from("shepherd-config.yaml"));
    if !Path::new(&config_path).exists() {
        info!(path = config_path, "no config file found, using defaults");
    }
    let config = ShepherdConfig::load_or_default(Path::new(&config_path))?;
    info!(
        host = config.server.host,
        port = config.server.port,
        capacity = config.store.capacity,
        "configuration loaded"
    );

    let state = Arc::new(AppState::new(config.store.capacity));

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state).await?;

    Ok(())
}
