//! Pointer hit-testing against the laid-out event flock.
//!
//! Resolution walks the snapshot in arrival order and returns the first
//! event whose circular footprint contains the pointer. Markers are
//! non-overlapping by layout design; when jitter collisions do overlap two
//! footprints, the earliest-arrival event wins by this rule.

use std::collections::BTreeMap;

use shepherd_types::{Event, LayoutSlot, Point};

/// Resolve a pointer coordinate to the event the operator intended to
/// select, or `None` when no footprint contains the point.
///
/// `slots` is the current id-to-slot mapping from the layout engine;
/// events without a slot (never laid out) cannot be hit.
pub fn resolve<'a, I>(
    point: Point,
    snapshot: I,
    slots: &BTreeMap<u64, LayoutSlot>,
) -> Option<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    snapshot
        .into_iter()
        .find(|event| slots.get(&event.id).is_some_and(|slot| slot.contains(point)))
}
