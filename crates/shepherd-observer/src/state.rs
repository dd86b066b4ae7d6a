//! Shared application state for the observer server.
//!
//! [`AppState`] holds the server-side event store and the broadcast channel
//! that fans stream envelopes out to every connected `WebSocket` client.
//! Mutation is serialized through the store's write lock; reads are served
//! from copy-on-read snapshots so clients never observe a partially applied
//! reconciliation step.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use shepherd_core::EventStore;
use shepherd_types::StreamMessage;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for stream envelopes.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest envelope.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for stream envelopes.
    pub tx: broadcast::Sender<StreamMessage>,
    /// The canonical recent-event log.
    pub store: Arc<RwLock<EventStore>>,
    /// Last id handed out by [`next_event_id`](Self::next_event_id).
    last_id: Arc<AtomicU64>,
}

impl AppState {
    /// Create a new application state with an empty store of the given
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            store: Arc::new(RwLock::new(EventStore::with_capacity(capacity))),
            last_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to the stream envelope broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<StreamMessage> {
        self.tx.subscribe()
    }

    /// Publish an envelope to all connected clients.
    ///
    /// Returns the number of receivers that got the message. Zero simply
    /// means no clients are connected; that is not an error.
    pub fn broadcast(&self, message: &StreamMessage) -> usize {
        self.tx.send(message.clone()).unwrap_or(0)
    }

    /// Assign the next event id.
    ///
    /// Ids are epoch milliseconds at ingest time, bumped past the previous
    /// id when two lines land in the same millisecond, so ids stay unique
    /// and roughly time-ordered for the lifetime of the process.
    pub fn next_event_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut claimed = 0;
        let _ = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                claimed = now.max(last.saturating_add(1));
                Some(claimed)
            });
        claimed
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(shepherd_core::DEFAULT_CAPACITY)
    }
}
