//! Shared type definitions for the Server Shepherd dashboard.
//!
//! This crate is the single source of truth for the types that cross the
//! wire between the observer server, the log agent, and dashboard clients.
//!
//! # Modules
//!
//! - [`event`] -- The canonical [`Event`] record and its severity [`EventKind`]
//! - [`protocol`] -- WebSocket envelopes ([`StreamMessage`], [`AckRequest`])
//! - [`geometry`] -- Layout and pointer primitives ([`LayoutSlot`], [`Point`])

pub mod event;
pub mod geometry;
pub mod protocol;

// Re-export all public types at crate root for convenience.
pub use event::{Event, EventKind};
pub use geometry::{LayoutSlot, Point};
pub use protocol::{AckRequest, StreamMessage};
