//! `WebSocket` handler for the live event stream.
//!
//! Clients connect to `GET /ws` and immediately receive an `init` envelope
//! carrying the current event log, then a `new_log` or `ack` envelope for
//! every change. The handler uses a [`broadcast::Receiver`] so all
//! connected clients see the same stream; if a client falls behind, lagged
//! messages are silently skipped and the client resumes from the most
//! recent envelope.
//!
//! The same connection carries operator actions upstream: a text frame of
//! the shape `{"action": "ack", "id": N}` marks the event acknowledged with
//! the server's own timestamp (the authoritative one) and broadcasts the
//! confirmation to every client, including the sender. Frames that are not
//! valid actions are ignored, matching how dashboards send opaque pings.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use chrono::Utc;
use shepherd_types::{AckRequest, StreamMessage};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin streaming
/// the event log.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the initial snapshot, then
/// forward broadcast envelopes while accepting acknowledgment actions.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before snapshotting so nothing published in between the
    // two steps is lost; a duplicate append reconciles harmlessly.
    let mut rx = state.subscribe();

    let snapshot = state.store.read().await.snapshot();
    if !send_envelope(&mut socket, &StreamMessage::Init(snapshot)).await {
        return;
    }

    loop {
        tokio::select! {
            // Receive a stream envelope to forward.
            result = rx.recv() => {
                match result {
                    Ok(envelope) => {
                        if !send_envelope(&mut socket, &envelope).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Receive an operator action or connection lifecycle frame.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_frame(&state, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore binary and pong frames.
                    }
                }
            }
        }
    }
}

/// Serialize and send one envelope. Returns false when the socket is gone.
async fn send_envelope(socket: &mut WebSocket, envelope: &StreamMessage) -> bool {
    let json = match serde_json::to_string(envelope) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize stream envelope: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Apply one text frame from a dashboard client.
///
/// Recognized actions mutate the store under the write lock and broadcast
/// the authoritative `ack` envelope. Anything else is dropped with a
/// diagnostic and no state change.
async fn handle_client_frame(state: &Arc<AppState>, text: &str) {
    let request: AckRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "ignoring unrecognized client frame");
            return;
        }
    };

    let AckRequest::Ack { id } = request;
    let confirmed = {
        let mut store = state.store.write().await;
        match store.get(id).cloned() {
            Some(mut event) => {
                event.acknowledge(Utc::now());
                store.append(event.clone());
                Some(event)
            }
            None => {
                debug!(id, "ack request for absent event, discarding");
                None
            }
        }
    };

    if let Some(event) = confirmed {
        let receivers = state.broadcast(&StreamMessage::Ack(Box::new(event)));
        debug!(id, receivers, "event acknowledged");
    }
}
