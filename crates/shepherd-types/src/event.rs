//! The canonical event record for one monitored server occurrence.
//!
//! Events are created by the observer's ingest path, replicated to dashboard
//! clients over the `WebSocket` stream, and mutated only by acknowledgment.
//! The `id` is the sole identity key; every other field except the
//! acknowledgment pair is an opaque display value set once at ingest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Severity classification derived from the HTTP status class at ingest.
///
/// Drives visual styling only; it has no behavioral effect anywhere in the
/// pipeline. Serialized under the wire name `type`. The `ok` alias accepts
/// streams recorded by older backends that used `ok` instead of `normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A routine request (status below 400).
    #[default]
    #[serde(alias = "ok")]
    Normal,
    /// A client error (status 400-499).
    Warning,
    /// A server error (status 500 and above).
    Error,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One monitored server occurrence with identity, classification, and
/// acknowledgment state.
///
/// # Invariants
///
/// - `id` is unique within a store's lifetime (the observer assigns
///   epoch-millisecond ids at ingest).
/// - `acknowledged` is monotonic: once true it never reverts, except when an
///   entire log is replaced by an `init` snapshot.
/// - `ack_time` is set exactly when `acknowledged` becomes true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identity key, assigned by the observer at ingest.
    pub id: u64,
    /// Severity classification (wire name `type`).
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    /// HTTP status as a display string (`"0"` when unparseable).
    pub status: String,
    /// The request line, e.g. `GET /index.html HTTP/1.1`.
    pub request: String,
    /// Client address extracted from the log line.
    pub ip: String,
    /// Timestamp string from the log line, or receipt time when absent.
    pub timestamp: String,
    /// Response size in bytes, when the log line carried one.
    #[serde(default)]
    pub size: Option<u64>,
    /// The raw log line exactly as received.
    pub raw: String,
    /// Whether an operator has acknowledged this event.
    #[serde(default)]
    pub acknowledged: bool,
    /// When the event was acknowledged. Present iff `acknowledged` is true.
    #[serde(default)]
    pub ack_time: Option<DateTime<Utc>>,
}

impl Event {
    /// Mark this event acknowledged at the given instant.
    ///
    /// Idempotent: acknowledging an already-acknowledged event leaves its
    /// original `ack_time` untouched.
    pub fn acknowledge(&mut self, at: DateTime<Utc>) {
        if !self.acknowledged {
            self.acknowledged = true;
            self.ack_time = Some(at);
        }
    }
}
