//! Observer server for the Server Shepherd dashboard.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) streaming the live event log to
//!   dashboard clients via [`tokio::sync::broadcast`], and accepting
//!   operator acknowledgment actions on the same connection
//! - **Ingest endpoint** (`POST /ingest`) where the log agent delivers raw
//!   access-log lines for parsing and classification
//! - **REST endpoints** for querying the recent event log
//! - **Minimal HTML status page** (`GET /`) showing live counters and
//!   links to the API
//!
//! # Architecture
//!
//! The observer owns the server-side [`EventStore`](shepherd_core::EventStore)
//! behind a read-write lock; every mutation happens under the write guard so
//! reconciliation steps never interleave, and readers work from copy-on-read
//! snapshots. Each accepted `WebSocket` client receives an `init` snapshot on
//! connect and then every `new_log`/`ack` envelope through the broadcast
//! channel, with automatic lag handling.

pub mod error;
pub mod handlers;
pub mod ingest;
pub mod parser;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
