//! The pursued target
//!
//! Agents read the target's position and whether it can be attacked, and
//! strike it through `apply_damage` followed by `flinch`.

use glam::Vec3;

/// Something agents can chase and hit.
pub trait Target {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Whether agents may pursue and attack right now.
    fn can_be_targeted(&self) -> bool;

    /// Remove `amount` health.
    fn apply_damage(&mut self, amount: i32);

    /// Hurt reaction after a strike lands.
    fn flinch(&mut self) {}
}

/// A stationary-or-scripted player with integer health.
#[derive(Debug, Clone)]
pub struct Player {
    /// World position
    pub position: Vec3,
    health: i32,
    active: bool,
    flinches: u32,
}

impl Player {
    #[must_use]
    pub fn new(position: Vec3, health: i32) -> Self {
        Self {
            position,
            health,
            active: true,
            flinches: 0,
        }
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Toggle targeting, e.g. during cutscenes or menus.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// How many hurt reactions have played.
    #[must_use]
    pub fn flinch_count(&self) -> u32 {
        self.flinches
    }
}

impl Target for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn can_be_targeted(&self) -> bool {
        self.active && self.is_alive()
    }

    fn apply_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    fn flinch(&mut self) {
        self.flinches += 1;
    }
}
