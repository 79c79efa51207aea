//! World-frame geometry for the exploration core.

use serde::{Deserialize, Serialize};

/// Two positions closer than this are the same physical location (meters).
///
/// Used only for comparing a freshly selected candidate against the active
/// goal. The blacklist uses its own, axis-aligned tolerance test; the two
/// are deliberately distinct.
pub const POSITION_EPSILON: f32 = 0.01;

/// World coordinates (meters, f32)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate in meters (forward in ROS convention)
    pub x: f32,
    /// Y coordinate in meters (left in ROS convention)
    pub y: f32,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle from this point to another (radians, CCW from +X)
    #[inline]
    pub fn angle_to(&self, other: &WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dy.atan2(dx)
    }

    /// Create a point at a given angle and distance from this point
    #[inline]
    pub fn point_at(&self, angle: f32, distance: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    /// Whether `other` is the same location within [`POSITION_EPSILON`].
    #[inline]
    pub fn same_location(&self, other: &WorldPoint) -> bool {
        self.distance(other) < POSITION_EPSILON
    }
}
