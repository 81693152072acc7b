//! Navigation service seam
//!
//! The AI core never searches the grid itself. It asks a service for a
//! waypoint sequence, for line-of-sight between two points and for whether
//! the cell under a point is occupied. Queries are read-only, so one service
//! can be shared by every agent in a tick.

use glam::{Vec2, Vec3};

/// Grid and visibility queries consumed by the steering and encounter logic.
pub trait NavigationService {
    /// Find a ground-plane path from `start` to `target`.
    ///
    /// Returns `None` when the target is unreachable. An empty sequence is
    /// treated the same way by callers.
    fn find_path(&self, start: Vec3, target: Vec3) -> Option<Vec<Vec2>>;

    /// Check whether nothing blocks the straight segment between two points.
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool;

    /// Check whether the grid cell containing `position` holds an obstacle.
    fn is_cell_occupied(&self, position: Vec3) -> bool;
}

/// Project a world position onto the ground plane (x, z).
#[must_use]
#[inline]
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Lift a ground-plane point back into world space at the given height.
#[must_use]
#[inline]
pub fn lift(point: Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}
