//! Pursuing-enemy AI for grid-navigated encounters
//!
//! This crate provides:
//! - A per-agent encounter state machine (idle, seek, approach, attack)
//! - Waypoint steering with turn-rate limits and line-of-sight shortcuts
//! - A* navigation over walkability grids
//! - An hecs-backed simulation with a double-buffered event queue

pub mod ai;
pub mod core;
pub mod ecs;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        Agent, AgentEvent, AnimationSignal, EncounterPhase, NavGrid, NavigationService, Player,
        Target,
    };
    pub use crate::core::{
        AgentConfig, AgentSpawn, EncounterScene, GameEvent, Simulation, SimulationConfig,
        SpawnError,
    };
    pub use crate::ecs::{Name, Transform, Velocity};
    pub use glam::{Vec2, Vec3};
}
