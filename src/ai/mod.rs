//! AI and navigation module
//!
//! Provides the pursuing-enemy brain: perception, the encounter state
//! machine, waypoint steering, and the navigation service they query.

mod agent;
mod encounter;
mod navigation;
mod pathfinding;
mod perception;
mod steering;
mod target;

#[cfg(test)]
pub(crate) mod test_support;

pub use agent::{Agent, AgentEvent, AgentTick, AnimationSignal};
pub use encounter::{EncounterContext, EncounterMachine, EncounterPhase, Transition};
pub use navigation::{NavigationService, lift, planar};
pub use pathfinding::{Cell, NavGrid};
pub use perception::Perception;
pub use steering::{
    SteeringController, WaypointPath, bearing, delta_angle, heading_vector, move_towards_angle,
    normalize_angle, speed_factor,
};
pub use target::{Player, Target};
