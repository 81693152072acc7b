//! Proximity perception with a latched alert flag

use glam::Vec3;

/// Whether the agent has noticed its target. Once set it stays set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Perception {
    alert: bool,
}

impl Perception {
    #[must_use]
    pub fn new(alert: bool) -> Self {
        Self { alert }
    }

    #[must_use]
    pub fn is_alert(&self) -> bool {
        self.alert
    }

    /// Check the target's distance against `radius`.
    ///
    /// Returns `true` only on the call that flips the flag.
    pub fn observe(&mut self, position: Vec3, target: Vec3, radius: f32) -> bool {
        if self.alert {
            return false;
        }
        self.alert = position.distance(target) < radius;
        self.alert
    }
}
