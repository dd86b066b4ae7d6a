//! Configuration types for the log agent.
//!
//! All configuration is loaded from environment variables; every variable
//! has a default so the agent runs against a local observer out of the
//! box.

use std::time::Duration;

use crate::error::AgentError;

/// Complete agent configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// The observer's ingest endpoint URL.
    pub ingest_url: String,
    /// Path of the access log to tail.
    pub log_file: String,
    /// How long to wait between polls when the log has no new lines.
    pub poll_interval: Duration,
    /// Per-request timeout for ingest deliveries.
    pub request_timeout: Duration,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `SHEPHERD_INGEST_URL` -- observer ingest endpoint
    ///   (default `http://localhost:8000/ingest`)
    /// - `SHEPHERD_LOG_FILE` -- log file to tail (default `access.log`)
    /// - `SHEPHERD_POLL_MS` -- idle poll interval in milliseconds
    ///   (default 500)
    /// - `SHEPHERD_REQUEST_TIMEOUT_MS` -- delivery timeout in milliseconds
    ///   (default 2000)
    pub fn from_env() -> Result<Self, AgentError> {
        Ok(Self {
            ingest_url: std::env::var("SHEPHERD_INGEST_URL")
                .unwrap_or_else(|_| String::from("http://localhost:8000/ingest")),
            log_file: std::env::var("SHEPHERD_LOG_FILE")
                .unwrap_or_else(|_| String::from("access.log")),
            poll_interval: Duration::from_millis(env_millis("SHEPHERD_POLL_MS", 500)?),
            request_timeout: Duration::from_millis(env_millis(
                "SHEPHERD_REQUEST_TIMEOUT_MS",
                2000,
            )?),
        })
    }
}

/// Read an optional millisecond variable, failing on unparseable values
/// rather than silently misconfiguring a timing knob.
fn env_millis(name: &str, default: u64) -> Result<u64, AgentError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| AgentError::InvalidVar {
            name: name.to_owned(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
