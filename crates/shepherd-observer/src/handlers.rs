//! REST API endpoint handlers for the observer server.
//!
//! All handlers read from the shared [`AppState`]'s event store via
//! copy-on-read snapshots; none of them mutate state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/events` | Recent event log (arrival order) |
//! | `GET` | `/api/events/:id` | Single event detail |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.read().await.snapshot();
    let event_count = snapshot.len();
    let acknowledged = snapshot.iter().filter(|e| e.acknowledged).count();
    let errors = snapshot
        .iter()
        .filter(|e| e.kind == shepherd_types::EventKind::Error)
        .count();
    let warnings = snapshot
        .iter()
        .filter(|e| e.kind == shepherd_types::EventKind::Warning)
        .count();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Server Shepherd Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Server Shepherd</h1>
    <p class="subtitle">Live request/audit event observer</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Events</div>
            <div class="value">{event_count}</div>
        </div>
        <div class="metric">
            <div class="label">Errors</div>
            <div class="value">{errors}</div>
        </div>
        <div class="metric">
            <div class="label">Warnings</div>
            <div class="value">{warnings}</div>
        </div>
        <div class="metric">
            <div class="label">Acknowledged</div>
            <div class="value">{acknowledged}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/events">/api/events</a> -- Recent event log</li>
        <li>GET /api/events/:id -- Single event detail</li>
        <li>POST /ingest -- Log line delivery (agent only)</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws</code> -- Live event stream + acknowledgments</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/events -- recent event log
// ---------------------------------------------------------------------------

/// Return the recent event log in arrival order.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.store.read().await.snapshot();

    Ok(Json(serde_json::json!({
        "count": snapshot.len(),
        "events": snapshot,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/events/:id -- single event detail
// ---------------------------------------------------------------------------

/// Return the full record for a single event.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id: u64 = id_str
        .parse()
        .map_err(|e| ObserverError::InvalidRequest(format!("invalid event id {id_str}: {e}")))?;

    let store = state.store.read().await;
    let event = store
        .get(id)
        .ok_or_else(|| ObserverError::NotFound(format!("event {id}")))?;

    Ok(Json(serde_json::to_value(event)?))
}
