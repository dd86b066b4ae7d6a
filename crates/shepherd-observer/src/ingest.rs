//! The log agent's delivery endpoint.
//!
//! `POST /ingest` accepts one raw access-log line per request, parses and
//! classifies it, appends the resulting event to the store, and broadcasts
//! a `new_log` envelope to every connected dashboard.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use shepherd_types::StreamMessage;
use tracing::debug;

use crate::error::ObserverError;
use crate::parser;
use crate::state::AppState;

/// Request body for `POST /ingest`.
#[derive(Debug, serde::Deserialize)]
pub struct IngestRequest {
    /// The raw log line to ingest.
    pub line: String,
}

/// Parse one log line, append it to the event log, and broadcast it.
///
/// Returns `{ok, parsed}` with the full event as stored. Empty lines are
/// rejected with a 400 without mutating any state.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IngestRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if body.line.trim().is_empty() {
        return Err(ObserverError::InvalidRequest(
            "empty log line".to_owned(),
        ));
    }

    let event = parser::event_from_line(&body.line, state.next_event_id(), Utc::now());

    {
        let mut store = state.store.write().await;
        store.append(event.clone());
    }

    let receivers = state.broadcast(&StreamMessage::NewLog(Box::new(event.clone())));
    debug!(id = event.id, receivers, "ingested log line");

    Ok(Json(serde_json::json!({
        "ok": true,
        "parsed": event,
    })))
}
