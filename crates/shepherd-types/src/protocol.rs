//! `WebSocket` envelopes exchanged between the observer and dashboards.
//!
//! Inbound (server to dashboard) frames are [`StreamMessage`] envelopes of
//! the shape `{"event": <kind>, "data": <payload>}`. Outbound (dashboard to
//! server) frames are [`AckRequest`] actions of the shape
//! `{"action": "ack", "id": <event id>}`.
//!
//! Unknown envelope kinds fail to deserialize; receivers are expected to log
//! the frame and drop it without mutating any state.

use serde::{Deserialize, Serialize};

use crate::event::Event;

// ---------------------------------------------------------------------------
// StreamMessage (inbound)
// ---------------------------------------------------------------------------

/// A framed message on the live event stream.
///
/// The three reconciliation facts a dashboard can receive:
///
/// | wire kind | payload | store effect |
/// |-----------|---------|--------------|
/// | `init`    | full event list | replace the log |
/// | `new_log` | single event | append (replace-in-place on duplicate id) |
/// | `ack`     | confirmed event | authoritative full-record replace |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Initial snapshot sent on connect; replaces the client's entire log.
    Init(Vec<Event>),
    /// One freshly ingested event to append.
    NewLog(Box<Event>),
    /// Authoritative server state for one acknowledged event.
    Ack(Box<Event>),
}

// ---------------------------------------------------------------------------
// AckRequest (outbound)
// ---------------------------------------------------------------------------

/// An operator's acknowledgment request for a single event.
///
/// Fire-and-forget toward the transport: the dashboard applies the
/// acknowledgment optimistically and the server's eventual
/// [`StreamMessage::Ack`] confirms (and supersedes) it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AckRequest {
    /// Acknowledge the event with the given id.
    Ack {
        /// The id of the event being acknowledged.
        id: u64,
    },
}

impl AckRequest {
    /// The id of the event this request acknowledges.
    pub const fn id(&self) -> u64 {
        match *self {
            Self::Ack { id } => id,
        }
    }
}
