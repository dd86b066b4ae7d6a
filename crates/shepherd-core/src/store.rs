//! The canonical bounded event log and its reconciliation rules.
//!
//! [`EventStore`] merges three kinds of inbound facts into one consistent
//! log: an initial snapshot, incremental appends, and acknowledgment
//! confirmations. Acknowledgments may additionally be applied optimistically
//! before the server round-trip completes; a later confirmation for the same
//! id is always authoritative and overwrites the optimistic values.
//!
//! # Invariants
//!
//! - At most one event per id, for every sequence of operations.
//! - At most `capacity` events; exceeding it evicts the oldest by arrival.
//! - Arrival order is the iteration order (newest-first display is a
//!   presentation concern, not a store concern).
//! - `acknowledged` never reverts to false except through a full reset.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use shepherd_types::{Event, StreamMessage};
use tracing::debug;

/// Default maximum number of events retained (matches the observer's
/// ingest buffer).
pub const DEFAULT_CAPACITY: usize = 200;

/// The reconciliation state machine owning the canonical event log.
#[derive(Debug, Clone)]
pub struct EventStore {
    /// Events in arrival order, oldest at the front.
    events: VecDeque<Event>,
    /// Maximum number of events retained.
    capacity: usize,
}

impl EventStore {
    /// Create an empty store with the default capacity of
    /// [`DEFAULT_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty store retaining at most `capacity` events.
    ///
    /// A capacity of zero is treated as one so the store can always hold
    /// the most recent event.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    // -------------------------------------------------------------------
    // Reconciliation entry points
    // -------------------------------------------------------------------

    /// Replace the entire log with the given sequence.
    ///
    /// Applied on an `init` snapshot. The sequence is folded through
    /// [`append`](Self::append), so duplicate ids collapse to their last
    /// occurrence and the result is truncated to the most recent
    /// `capacity` entries. Always succeeds.
    pub fn reset(&mut self, events: Vec<Event>) {
        self.events.clear();
        for event in events {
            self.append(event);
        }
    }

    /// Append one event, guarding against duplicate delivery.
    ///
    /// If an event with the same id already exists, the incoming record
    /// replaces it in place without changing log length or position. The
    /// merge is monotonic for acknowledgment: a duplicate that arrives
    /// unacknowledged after the stored entry was acknowledged keeps the
    /// existing `acknowledged`/`ack_time` pair, so re-delivery of the
    /// original record cannot undo an acknowledgment. Otherwise the event
    /// is pushed at the end and the oldest entry is evicted once the log
    /// exceeds capacity.
    pub fn append(&mut self, event: Event) {
        if let Some(existing) = self.events.iter_mut().find(|e| e.id == event.id) {
            let mut incoming = event;
            if existing.acknowledged && !incoming.acknowledged {
                incoming.acknowledged = true;
                incoming.ack_time = existing.ack_time;
            }
            *existing = incoming;
            return;
        }
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// Apply an authoritative acknowledgment confirmation.
    ///
    /// Replaces the matching entry's full field set with the server's
    /// values, superseding any optimistic acknowledgment for the same id.
    /// A confirmation for an id no longer present (evicted, or never seen)
    /// is silently discarded: eviction is normal capacity policy, not data
    /// loss. Returns whether an entry was replaced.
    pub fn apply_ack_confirmed(&mut self, event: Event) -> bool {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => {
                *existing = event;
                true
            }
            None => {
                debug!(id = event.id, "ack confirmation for absent event, discarding");
                false
            }
        }
    }

    /// Apply a local, provisional acknowledgment before the server
    /// confirmation arrives.
    ///
    /// Sets `acknowledged` and stamps `ack_time` with `at` so the UI
    /// reflects operator intent immediately. Idempotent: an already
    /// acknowledged event keeps its original `ack_time`. Returns whether
    /// the id is present in the store.
    pub fn request_ack_optimistic(&mut self, id: u64, at: DateTime<Utc>) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.acknowledge(at);
                true
            }
            None => false,
        }
    }

    /// Dispatch one stream message to the matching reconciliation step.
    pub fn apply(&mut self, message: StreamMessage) {
        match message {
            StreamMessage::Init(events) => self.reset(events),
            StreamMessage::NewLog(event) => self.append(*event),
            StreamMessage::Ack(event) => {
                self.apply_ack_confirmed(*event);
            }
        }
    }

    // -------------------------------------------------------------------
    // Read side
    // -------------------------------------------------------------------

    /// An owned, ordered copy of the current log (oldest first).
    ///
    /// Copy-on-read: the returned vector is detached from the store, so
    /// consumers never observe a partially applied mutation.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    /// Iterate the log in arrival order without copying.
    pub fn events(&self) -> impl Iterator<Item = &Event> + Clone {
        self.events.iter()
    }

    /// Look up an event by id.
    pub fn get(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Whether an event with the given id is present.
    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The maximum number of events this store retains.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
