//! Error types for the log agent.

/// Errors that can occur while configuring or running the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An environment variable held an unparseable value.
    #[error("invalid value for {name}: {value}")]
    InvalidVar {
        /// The variable's name.
        name: String,
        /// The offending value.
        value: String,
    },

    /// The log file could not be opened or read.
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),

    /// A delivery to the observer failed.
    #[error("ingest delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),

    /// The observer rejected a delivery.
    #[error("observer rejected delivery with status {0}")]
    Rejected(u16),
}
