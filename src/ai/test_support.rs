//! Test doubles for the navigation service.

use std::cell::Cell;

use glam::{Vec2, Vec3};

use super::navigation::{NavigationService, planar};

/// Navigation service with fixed answers.
///
/// Paths run straight from the start to the target: two waypoints, the first
/// one under the agent so the short-circuit skips it.
#[derive(Debug, Default)]
pub(crate) struct FakeNav {
    pub line_of_sight: bool,
    pub occupied: bool,
    pub unreachable: bool,
    requests: Cell<usize>,
}

impl FakeNav {
    /// Line of sight always blocked, cells free, everything reachable.
    pub fn blocked() -> Self {
        Self::default()
    }

    /// Line of sight always clear.
    pub fn clear() -> Self {
        Self {
            line_of_sight: true,
            ..Self::default()
        }
    }

    /// No path can be found to anything.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Report every cell as occupied.
    pub fn occupied(mut self) -> Self {
        self.occupied = true;
        self
    }

    /// Number of `find_path` calls so far.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl NavigationService for FakeNav {
    fn find_path(&self, start: Vec3, target: Vec3) -> Option<Vec<Vec2>> {
        self.requests.set(self.requests.get() + 1);
        (!self.unreachable).then(|| vec![planar(start), planar(target)])
    }

    fn has_line_of_sight(&self, _from: Vec3, _to: Vec3) -> bool {
        self.line_of_sight
    }

    fn is_cell_occupied(&self, _position: Vec3) -> bool {
        self.occupied
    }
}
