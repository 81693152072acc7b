//! Agent runtime
//!
//! Ties perception, the encounter machine and steering together for one
//! enemy. [`Agent::tick`] is the whole per-frame logic step: it returns the
//! velocity for the physics step, the animation signal and any one-shot
//! events, and never moves the agent itself.

use glam::Vec3;
use smallvec::SmallVec;

use super::encounter::{EncounterContext, EncounterMachine, EncounterPhase};
use super::navigation::NavigationService;
use super::perception::Perception;
use super::steering::SteeringController;
use super::target::Target;
use crate::core::AgentConfig;
use crate::ecs::Transform;

/// Discrete animation state reported every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnimationSignal {
    #[default]
    Idle,
    Walk,
    Attack,
    Dead,
}

impl AnimationSignal {
    /// Clip name the animation layer plays for this signal.
    #[must_use]
    pub fn clip(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Attack => "attack",
            Self::Dead => "dead",
        }
    }
}

/// One-shot happenings raised during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    /// The target was noticed for the first time
    Alerted,
    /// A strike connected
    Struck { amount: i32 },
    /// A path request came back empty
    PathUnavailable,
    /// The encounter changed phase
    PhaseChanged {
        from: EncounterPhase,
        to: EncounterPhase,
    },
}

/// Output of one logic tick.
#[derive(Debug, Clone, Default)]
pub struct AgentTick {
    pub signal: AnimationSignal,
    /// Velocity for the physics step (units per second)
    pub velocity: Vec3,
    pub events: SmallVec<[AgentEvent; 4]>,
}

/// A pursuing enemy.
#[derive(Debug, Clone)]
pub struct Agent {
    config: AgentConfig,
    health: i32,
    dead: bool,
    perception: Perception,
    steering: SteeringController,
    encounter: EncounterMachine,
}

impl Agent {
    /// Create an agent from its config. Health starts at least at 1.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self {
            health: config.health.max(1),
            dead: false,
            perception: Perception::new(config.start_alert),
            steering: SteeringController::new(),
            encounter: EncounterMachine::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[must_use]
    pub fn is_alert(&self) -> bool {
        self.perception.is_alert()
    }

    #[must_use]
    pub fn phase(&self) -> EncounterPhase {
        self.encounter.phase()
    }

    #[must_use]
    pub fn steering(&self) -> &SteeringController {
        &self.steering
    }

    /// Remove health. Returns `true` if this blow killed the agent.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.kill();
            return true;
        }
        false
    }

    /// Mark the agent dead. There is no way back.
    pub fn kill(&mut self) {
        self.dead = true;
        self.steering.clear();
    }

    /// Jump straight into a phase, running its enter hook.
    pub fn force_phase(&mut self, phase: EncounterPhase) {
        self.encounter.force(phase, &mut self.steering, &self.config);
    }

    /// Run one logic tick.
    ///
    /// The encounter machine runs first so any re-plan it issues is steered
    /// along in the same tick.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        nav: &dyn NavigationService,
        target: &mut dyn Target,
        dt: f32,
    ) -> AgentTick {
        if self.dead {
            return AgentTick {
                signal: AnimationSignal::Dead,
                ..AgentTick::default()
            };
        }

        let mut events = SmallVec::new();
        let signal = {
            let mut ctx = EncounterContext {
                config: &self.config,
                position: transform.position,
                target: &mut *target,
                nav,
                steering: &mut self.steering,
                perception: &mut self.perception,
                delta_time: dt,
                events: &mut events,
                signal: AnimationSignal::Idle,
            };
            self.encounter.update(&mut ctx);
            ctx.signal
        };

        let velocity = self
            .steering
            .steer(transform, target.position(), nav, &self.config, dt);

        AgentTick {
            signal,
            velocity,
            events,
        }
    }
}
