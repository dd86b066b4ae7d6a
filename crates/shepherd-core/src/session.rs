//! One dashboard connection's view of the live event stream.
//!
//! [`DashboardSession`] wires the three core pieces together the way a
//! render loop consumes them: raw stream frames go in, positions and
//! pointer selections come out, and operator acknowledgments produce the
//! outbound request for the transport while taking effect locally at once.
//!
//! The session is strictly single-threaded: every entry point takes
//! `&mut self`, so reconciliation steps can never interleave.

use std::collections::BTreeMap;

use chrono::Utc;
use shepherd_types::{AckRequest, Event, LayoutSlot, Point, StreamMessage};
use tracing::warn;

use crate::hit;
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::store::EventStore;

/// The client-side reconciliation and presentation state machine.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    /// The canonical bounded event log.
    store: EventStore,
    /// Memoized marker positions.
    layout: LayoutEngine,
}

impl DashboardSession {
    /// Create a session with default store capacity and canvas geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with explicit store capacity and canvas geometry.
    pub fn with_config(capacity: usize, layout: LayoutConfig) -> Self {
        Self {
            store: EventStore::with_capacity(capacity),
            layout: LayoutEngine::new(layout),
        }
    }

    // -------------------------------------------------------------------
    // Inbound stream
    // -------------------------------------------------------------------

    /// Parse and apply one raw transport frame.
    ///
    /// Malformed frames and unknown envelope kinds are logged and dropped
    /// without touching any state; they are diagnostics, never fatal.
    /// Returns whether the frame was applied.
    pub fn handle_frame(&mut self, raw: &str) -> bool {
        match serde_json::from_str::<StreamMessage>(raw) {
            Ok(message) => {
                self.apply(message);
                true
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed stream frame");
                false
            }
        }
    }

    /// Apply one already-parsed stream message.
    ///
    /// Survivors of an `init` replacement keep their cached layout slots;
    /// slots for departed ids are pruned on the next layout pass.
    pub fn apply(&mut self, message: StreamMessage) {
        self.store.apply(message);
    }

    // -------------------------------------------------------------------
    // Presentation
    // -------------------------------------------------------------------

    /// Current id-to-slot mapping, computing slots for newly arrived
    /// events.
    pub fn positions(&mut self) -> &BTreeMap<u64, LayoutSlot> {
        self.layout.positions_for(self.store.events())
    }

    /// Resolve a pointer coordinate to the event under it, if any.
    pub fn select_at(&mut self, point: Point) -> Option<&Event> {
        let slots = self.layout.positions_for(self.store.events());
        hit::resolve(point, self.store.events(), slots)
    }

    // -------------------------------------------------------------------
    // Operator actions
    // -------------------------------------------------------------------

    /// Acknowledge an event on the operator's behalf.
    ///
    /// Applies the optimistic local update immediately and returns the
    /// outbound request for the transport. The caller may skip the send if
    /// the transport is down; the optimistic update stands either way and
    /// the eventual server confirmation supersedes it. Returns `None` when
    /// the id is not in the store (nothing to acknowledge or confirm).
    pub fn acknowledge(&mut self, id: u64) -> Option<AckRequest> {
        self.store
            .request_ack_optimistic(id, Utc::now())
            .then_some(AckRequest::Ack { id })
    }

    // -------------------------------------------------------------------
    // Read side
    // -------------------------------------------------------------------

    /// The underlying event store.
    pub const fn store(&self) -> &EventStore {
        &self.store
    }

    /// An owned, ordered copy of the current log.
    pub fn snapshot(&self) -> Vec<Event> {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shepherd_types::EventKind;

    fn sample(id: u64) -> Event {
        Event {
            id,
            kind: EventKind::Error,
            status: String::from("500"),
            request: String::from("GET /api/data HTTP/1.1"),
            ip: String::from("127.0.0.1"),
            timestamp: String::from("now"),
            size: None,
            raw: String::from("line"),
            acknowledged: false,
            ack_time: None,
        }
    }

    fn frame(message: &StreamMessage) -> String {
        serde_json::to_string(message).unwrap_or_default()
    }

    #[test]
    fn frames_flow_through_to_the_store() {
        let mut session = DashboardSession::new();
        assert!(session.handle_frame(&frame(&StreamMessage::Init(vec![sample(1)]))));
        assert!(session.handle_frame(&frame(&StreamMessage::NewLog(Box::new(sample(2))))));
        assert_eq!(session.snapshot().len(), 2);
    }

    #[test]
    fn malformed_frame_leaves_state_untouched() {
        let mut session = DashboardSession::new();
        session.apply(StreamMessage::Init(vec![sample(1)]));

        assert!(!session.handle_frame("{not json"));
        assert!(!session.handle_frame(r#"{"event":"stats","data":{}}"#));
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn click_resolves_to_laid_out_event() {
        let mut session = DashboardSession::new();
        session.apply(StreamMessage::Init(vec![sample(1000)]));

        let slot = session
            .positions()
            .get(&1000)
            .copied()
            .unwrap_or(LayoutSlot { x: -1.0, y: -1.0, diameter: 0.0 });
        let hit = session.select_at(Point::new(slot.x, slot.y));
        assert_eq!(hit.map(|e| e.id), Some(1000));

        assert!(session.select_at(Point::new(-50.0, -50.0)).is_none());
    }

    #[test]
    fn acknowledge_is_optimistic_and_produces_the_request() {
        let mut session = DashboardSession::new();
        session.apply(StreamMessage::Init(vec![sample(7)]));

        let request = session.acknowledge(7);
        assert_eq!(request, Some(AckRequest::Ack { id: 7 }));
        assert_eq!(session.store().get(7).map(|e| e.acknowledged), Some(true));

        // Unknown ids produce nothing to send.
        assert_eq!(session.acknowledge(99), None);
    }

    #[test]
    fn confirmation_supersedes_optimistic_ack() {
        let mut session = DashboardSession::new();
        session.apply(StreamMessage::Init(vec![sample(7)]));
        session.acknowledge(7);

        let server_time = Utc::now() + chrono::Duration::seconds(5);
        let mut confirmed = sample(7);
        confirmed.acknowledged = true;
        confirmed.ack_time = Some(server_time);
        session.apply(StreamMessage::Ack(Box::new(confirmed)));

        assert_eq!(
            session.store().get(7).and_then(|e| e.ack_time),
            Some(server_time)
        );
    }

    #[test]
    fn init_replacement_keeps_survivor_positions() {
        let mut session = DashboardSession::new();
        session.apply(StreamMessage::Init(vec![sample(1), sample(2), sample(3)]));
        let before = session.positions().clone();

        // Reconnect snapshot: 1 is gone, 4 is new, 2 and 3 survive.
        session.apply(StreamMessage::Init(vec![sample(2), sample(3), sample(4)]));
        let after = session.positions().clone();

        assert_eq!(after.get(&2), before.get(&2));
        assert_eq!(after.get(&3), before.get(&3));
        assert!(!after.contains_key(&1));
        assert!(after.contains_key(&4));
    }
}
