//! Log-shipping agent for the Server Shepherd observer.
//!
//! The agent tails a combined-format access log and ships every new
//! line to the observer's ingest endpoint over HTTP. The observer owns
//! parsing and classification; the agent's only job is to move raw
//! lines off the box reliably.
//!
//! # Architecture
//!
//! ```text
//! access.log --> LogTailer --> IngestClient --> POST /ingest
//! ```
//!
//! Delivery failures are logged and the line is dropped, so a flapping
//! observer never stalls the tail loop.

mod config;
mod error;
mod ship;
mod tail;

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AgentConfig;
use crate::ship::IngestClient;
use crate::tail::{LogTailer, ensure_sample_log};

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// seeds a sample log when the target file is missing, then tails it
/// indefinitely, shipping each new line to the observer.
///
/// # Errors
///
/// Returns an error if initialization fails or the log file becomes
/// unreadable.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("shepherd-agent starting");

    // Load configuration from environment
    let config = AgentConfig::from_env()?;
    info!(
        ingest_url = config.ingest_url,
        log_file = config.log_file,
        poll_interval_ms = config.poll_interval.as_millis(),
        request_timeout_ms = config.request_timeout.as_millis(),
        "configuration loaded"
    );

    let path = Path::new(&config.log_file);
    if ensure_sample_log(path).await? {
        info!(log_file = config.log_file, "created sample log file");
    }

    let client = IngestClient::new(config.ingest_url.clone(), config.request_timeout)?;
    let mut tailer = LogTailer::open(path, config.poll_interval, true).await?;

    info!("tailing log, entering ship loop");
    loop {
        let line = tailer.next_line().await?;
        match client.ship(&line).await {
            Ok(()) => info!(line, "shipped log line"),
            Err(err) => warn!(error = %err, line, "delivery failed, line dropped"),
        }
    }
}
