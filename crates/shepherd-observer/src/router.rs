//! Axum router construction for the observer API.
//!
//! Assembles all routes (REST + `WebSocket` + ingest) into a single
//! [`Router`] with CORS middleware enabled for cross-origin dashboard
//! access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::ingest;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` event stream + acknowledgment actions
/// - `POST /ingest` -- log line delivery from the agent
/// - `GET /api/events` -- recent event log
/// - `GET /api/events/:id` -- single event detail
///
/// CORS is configured to allow any origin for development. In production
/// this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_events))
        // Ingest
        .route("/ingest", post(ingest::ingest))
        // REST API
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/{id}", get(handlers::get_event))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
