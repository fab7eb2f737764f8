//! Battlefield bounds for the combat simulation.
//!
//! The battlefield is an axis-aligned rectangle with its origin at the
//! top-left corner. All collision and sensing geometry happens in "game
//! units" inside this rectangle; the resolver treats anything whose
//! footprint crosses an edge as a wall hit.
//!
//! # Example
//!
//! ```
//! use hulldown_core::battlefield::Battlefield;
//! use glam::Vec2;
//!
//! let battlefield = Battlefield::new(500.0, 500.0);
//!
//! // A tank well inside the bounds fits.
//! assert!(battlefield.contains_circle(Vec2::new(250.0, 250.0), 18.0));
//!
//! // One hugging the left edge does not.
//! assert!(!battlefield.contains_circle(Vec2::new(2.0, 100.0), 18.0));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned battlefield rectangle.
///
/// The origin is the top-left corner; `x` grows to the right and `y` grows
/// downward, matching the coordinate system entities move in.
///
/// # Invariants
///
/// Width and height must be positive. The constructor does not validate this
/// (the driver guarantees it per the call contract); a zero or negative
/// dimension simply makes every footprint test fail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    width: f32,
    height: f32,
}

impl Battlefield {
    /// Creates a battlefield with the given dimensions in game units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the battlefield width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Returns the battlefield height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Checks whether a circular footprint lies entirely inside the bounds.
    ///
    /// Returns `false` as soon as the circle extends past any of the four
    /// edges. Touching an edge exactly still counts as inside; only crossing
    /// it is a wall hit.
    #[must_use]
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= 0.0
            && center.x + radius <= self.width
            && center.y - radius >= 0.0
            && center.y + radius <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_dimensions() {
        let battlefield = Battlefield::new(800.0, 600.0);
        assert_eq!(battlefield.width(), 800.0);
        assert_eq!(battlefield.height(), 600.0);
    }

    #[test]
    fn circle_inside_is_contained() {
        let battlefield = Battlefield::new(500.0, 500.0);
        assert!(battlefield.contains_circle(Vec2::new(250.0, 250.0), 50.0));
    }

    #[test]
    fn circle_crossing_each_edge_is_rejected() {
        let battlefield = Battlefield::new(500.0, 500.0);

        // Left, right, top, bottom.
        assert!(!battlefield.contains_circle(Vec2::new(5.0, 250.0), 10.0));
        assert!(!battlefield.contains_circle(Vec2::new(495.0, 250.0), 10.0));
        assert!(!battlefield.contains_circle(Vec2::new(250.0, 5.0), 10.0));
        assert!(!battlefield.contains_circle(Vec2::new(250.0, 495.0), 10.0));
    }

    #[test]
    fn circle_touching_edge_is_contained() {
        let battlefield = Battlefield::new(500.0, 500.0);
        assert!(battlefield.contains_circle(Vec2::new(10.0, 250.0), 10.0));
        assert!(battlefield.contains_circle(Vec2::new(490.0, 250.0), 10.0));
    }

    #[test]
    fn zero_radius_point_inside() {
        let battlefield = Battlefield::new(500.0, 500.0);
        assert!(battlefield.contains_circle(Vec2::new(0.0, 0.0), 0.0));
        assert!(!battlefield.contains_circle(Vec2::new(-1.0, 0.0), 0.0));
    }

    #[test]
    fn serialization_roundtrip() {
        let battlefield = Battlefield::new(500.0, 500.0);
        let json = serde_json::to_string(&battlefield).unwrap();
        let deserialized: Battlefield = serde_json::from_str(&json).unwrap();
        assert_eq!(battlefield, deserialized);
    }
}
