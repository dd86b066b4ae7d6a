//! Deterministic, memoizing grid layout for the event flock.
//!
//! Each event gets a stable canvas position the first time it is laid out
//! and keeps it for as long as it remains in the store, even when eviction
//! shifts everyone else's index. Column and row come from the event's index
//! in the snapshot order at first layout; the small vertical jitter is a
//! deterministic hash of the id (`id mod 1000`), never a random source, so
//! re-layout is reproducible across runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use shepherd_types::{Event, LayoutSlot};

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

/// Logical canvas geometry for the layout grid.
///
/// Defaults match the dashboard canvas: 800x600 with 40px padding, six
/// columns, 80px rows, up to 30px of per-id jitter, and 36px markers.
/// Rows past the bottom edge simply overflow the canvas; the engine does
/// not wrap or rescale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Padding between the canvas edge and the grid.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Number of grid columns.
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Vertical distance between grid rows.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Maximum vertical jitter added from the id hash.
    #[serde(default = "default_jitter_range")]
    pub jitter_range: f64,
    /// Marker diameter.
    #[serde(default = "default_diameter")]
    pub diameter: f64,
}

const fn default_width() -> f64 {
    800.0
}

const fn default_height() -> f64 {
    600.0
}

const fn default_padding() -> f64 {
    40.0
}

const fn default_columns() -> usize {
    6
}

const fn default_row_height() -> f64 {
    80.0
}

const fn default_jitter_range() -> f64 {
    30.0
}

const fn default_diameter() -> f64 {
    36.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: default_padding(),
            columns: default_columns(),
            row_height: default_row_height(),
            jitter_range: default_jitter_range(),
            diameter: default_diameter(),
        }
    }
}

// ---------------------------------------------------------------------------
// LayoutEngine
// ---------------------------------------------------------------------------

/// Assigns and memoizes one [`LayoutSlot`] per live event id.
///
/// # Memoization contract
///
/// Once an id's slot is computed it is returned unchanged on every later
/// call, regardless of how the snapshot order shifts underneath it. Only
/// ids not yet in the cache get a fresh slot, derived from their index in
/// the snapshot passed at that moment. Slots for ids that have left the
/// snapshot (evicted events) are discarded.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    /// Canvas geometry.
    config: LayoutConfig,
    /// Cached slot per live event id.
    slots: BTreeMap<u64, LayoutSlot>,
}

impl LayoutEngine {
    /// Create an engine for the given canvas geometry.
    pub const fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            slots: BTreeMap::new(),
        }
    }

    /// Return the id-to-slot mapping for a snapshot, computing and caching
    /// slots for ids seen for the first time.
    ///
    /// Never fails and always returns exactly one slot per snapshot event.
    /// Safe to call repeatedly from a render tick: cache population is
    /// idempotent for a given id.
    pub fn positions_for<'a, I>(&mut self, snapshot: I) -> &BTreeMap<u64, LayoutSlot>
    where
        I: IntoIterator<Item = &'a Event> + Clone,
    {
        // Drop slots whose events were evicted since the last call.
        let live: BTreeSet<u64> = snapshot.clone().into_iter().map(|e| e.id).collect();
        self.slots.retain(|id, _| live.contains(id));

        for (index, event) in snapshot.into_iter().enumerate() {
            if !self.slots.contains_key(&event.id) {
                let slot = self.slot_at(index, event.id);
                self.slots.insert(event.id, slot);
            }
        }
        &self.slots
    }

    /// The cached slot for an id, if it has been laid out.
    pub fn slot(&self, id: u64) -> Option<LayoutSlot> {
        self.slots.get(&id).copied()
    }

    /// Number of cached slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Discard every cached slot.
    ///
    /// Not part of normal operation; the next `positions_for` call rebuilds
    /// the mapping from the then-current snapshot order.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Compute the slot for an id first laid out at `index` in snapshot
    /// order.
    fn slot_at(&self, index: usize, id: u64) -> LayoutSlot {
        let columns = self.config.columns.max(1);
        let cell_width = (self.config.width - self.config.padding * 2.0) / columns as f64;
        let column = index % columns;
        let row = index / columns;

        // Stable pseudo-random vertical offset derived from the id alone.
        let jitter = (id % 1000) as f64 / 1000.0 * self.config.jitter_range;

        let x = (column as f64).mul_add(cell_width, self.config.padding) + cell_width * 0.5;
        let y = (row as f64).mul_add(self.config.row_height, self.config.padding) + jitter;

        LayoutSlot {
            x,
            y,
            diameter: self.config.diameter,
        }
    }
}
