//! Core simulation module
//!
//! Contains configuration, the event queue, scene files and the
//! fixed-order simulation loop.

mod config;
mod events;
mod scene;
mod simulation;

pub use config::{AgentConfig, SimulationConfig};
pub use events::{EventQueue, GameEvent};
pub use scene::{AgentSpawn, EncounterScene, SceneError};
pub use simulation::{Simulation, SpawnError};
