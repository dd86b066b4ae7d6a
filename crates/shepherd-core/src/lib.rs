//! Event reconciliation, layout, and hit-testing core for Server Shepherd.
//!
//! This crate holds the state machines behind the live dashboard:
//!
//! - [`store`] -- the bounded, ordered, deduplicated event log and the
//!   reconciliation rules that merge snapshots, appends, and acknowledgment
//!   confirmations without lost or duplicated updates
//! - [`layout`] -- the memoizing engine that assigns each event a stable
//!   canvas position as the set changes frame to frame
//! - [`hit`] -- pointer resolution from a canvas coordinate back to the
//!   originating event
//! - [`session`] -- the client-side wiring of the three: one dashboard
//!   connection's view of the world, fed by raw stream frames
//! - [`config`] -- typed YAML configuration for the whole workspace
//!
//! Everything here is synchronous and transport-agnostic. The observer
//! server and any render loop are consumers, not collaborators.

pub mod config;
pub mod hit;
pub mod layout;
pub mod session;
pub mod store;

pub use config::{ConfigError, ShepherdConfig};
pub use layout::{LayoutConfig, LayoutEngine};
pub use session::DashboardSession;
pub use store::{DEFAULT_CAPACITY, EventStore};
