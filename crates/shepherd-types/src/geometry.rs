//! Layout and pointer primitives for the dashboard canvas.
//!
//! Coordinates are in logical canvas space (origin top-left, y down), the
//! same space pointer input arrives in.

use serde::{Deserialize, Serialize};

/// A pointer coordinate in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, pixels from the left edge.
    pub x: f64,
    /// Vertical position, pixels from the top edge.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cached visual position and size for one event id.
///
/// Owned exclusively by the layout engine. A slot is computed once, the
/// first time its id is laid out, and never changes while the id remains in
/// the store; it is discarded when the event is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSlot {
    /// Center x of the marker.
    pub x: f64,
    /// Center y of the marker.
    pub y: f64,
    /// Marker diameter.
    pub diameter: f64,
}

impl LayoutSlot {
    /// Whether a pointer lies strictly inside this slot's circular
    /// footprint (radius `diameter / 2` around the center).
    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        let radius = self.diameter / 2.0;
        dx.mul_add(dx, dy * dy) < radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_inside() {
        let slot = LayoutSlot { x: 100.0, y: 100.0, diameter: 36.0 };
        assert!(slot.contains(Point::new(100.0, 100.0)));
    }

    #[test]
    fn far_point_is_outside() {
        let slot = LayoutSlot { x: 100.0, y: 100.0, diameter: 36.0 };
        assert!(!slot.contains(Point::new(200.0, 200.0)));
    }

    #[test]
    fn boundary_is_exclusive() {
        // A point exactly on the rim (radius 18 straight up) is not a hit.
        let slot = LayoutSlot { x: 100.0, y: 100.0, diameter: 36.0 };
        assert!(!slot.contains(Point::new(100.0, 82.0)));
        assert!(slot.contains(Point::new(100.0, 82.5)));
    }
}
