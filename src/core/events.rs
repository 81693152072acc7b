//! Simulation events for animation, audio and UI listeners
//!
//! Agents raise one-shot events during the logic tick; presentation layers
//! read them on the following frame. The queue is double-buffered so what a
//! listener sees never depends on agent update order.
//!
//! # Example
//!
//! ```ignore
//! simulation.frame(&grid, &mut player, dt);
//!
//! for event in simulation.events().iter() {
//!     if let GameEvent::AgentAlerted { entity } = event {
//!         play_growl(*entity);
//!     }
//! }
//! ```

use glam::Vec3;
use hecs::Entity;

use crate::ai::{AgentEvent, EncounterPhase};

// ============================================================================
// Event Types
// ============================================================================

/// Simulation events for presentation listeners.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    /// An agent entered the simulation.
    AgentSpawned {
        entity: Entity,
        position: Vec3,
    },

    /// An agent noticed its target for the first time.
    AgentAlerted {
        entity: Entity,
    },

    /// An agent's strike connected with the target.
    TargetStruck {
        /// The attacking agent
        entity: Entity,
        /// Damage dealt
        amount: i32,
    },

    /// A path request came back empty mid-encounter.
    PathUnavailable {
        entity: Entity,
    },

    /// An agent's encounter phase changed.
    PhaseChanged {
        entity: Entity,
        from: EncounterPhase,
        to: EncounterPhase,
    },

    /// An agent's health ran out.
    AgentDied {
        entity: Entity,
    },

    /// An agent was taken out of the simulation.
    AgentRemoved {
        entity: Entity,
        /// Why it was removed
        reason: &'static str,
    },
}

impl GameEvent {
    /// Attach the raising entity to an agent-local event.
    #[must_use]
    pub fn from_agent(entity: Entity, event: AgentEvent) -> Self {
        match event {
            AgentEvent::Alerted => Self::AgentAlerted { entity },
            AgentEvent::Struck { amount } => Self::TargetStruck { entity, amount },
            AgentEvent::PathUnavailable => Self::PathUnavailable { entity },
            AgentEvent::PhaseChanged { from, to } => Self::PhaseChanged { entity, from, to },
        }
    }

    /// The agent the event is about.
    #[must_use]
    pub fn entity(&self) -> Entity {
        match self {
            Self::AgentSpawned { entity, .. }
            | Self::AgentAlerted { entity }
            | Self::TargetStruck { entity, .. }
            | Self::PathUnavailable { entity }
            | Self::PhaseChanged { entity, .. }
            | Self::AgentDied { entity }
            | Self::AgentRemoved { entity, .. } => *entity,
        }
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// Two-buffer event queue.
///
/// Events raised while frame N runs become readable once frame N+1 begins
/// and stay readable until frame N+2 begins.
#[derive(Debug, Default)]
pub struct EventQueue {
    writing: Vec<GameEvent>,
    readable: Vec<GameEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with room for `capacity` events per frame before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writing: Vec::with_capacity(capacity),
            readable: Vec::with_capacity(capacity),
        }
    }

    /// Raise an event; readers see it after the next [`swap`](Self::swap).
    pub fn push(&mut self, event: GameEvent) {
        self.writing.push(event);
    }

    /// Start a frame: last frame's events become readable, older ones drop.
    pub fn swap(&mut self) {
        self.readable.clear();
        std::mem::swap(&mut self.writing, &mut self.readable);
    }

    /// Events raised during the previous frame, in the order raised.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.readable.iter()
    }

    /// Take the readable events out of the queue.
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.readable.drain(..)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readable.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readable.len()
    }

    /// Events raised this frame, not yet readable.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.writing.len()
    }

    pub fn clear(&mut self) {
        self.writing.clear();
        self.readable.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
