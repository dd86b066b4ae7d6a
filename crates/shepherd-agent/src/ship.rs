//! Delivery of log lines to the observer's ingest endpoint.

use std::time::Duration;

use crate::error::AgentError;

/// HTTP client for the observer's `POST /ingest` endpoint.
#[derive(Debug, Clone)]
pub struct IngestClient {
    /// Underlying HTTP client with the delivery timeout applied.
    client: reqwest::Client,
    /// Full ingest endpoint URL.
    url: String,
}

impl IngestClient {
    /// Build a client that delivers to `url` with the given per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: String, timeout: Duration) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Deliver one raw log line to the observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the observer responds
    /// with a non-success status.
    pub async fn ship(&self, line: &str) -> Result<(), AgentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "line": line }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
