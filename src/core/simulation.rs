//! Fixed-order simulation loop
//!
//! A frame is one logic tick for every agent followed by one physics tick.
//! The logic tick runs each agent's [`Agent::tick`] to completion and stores
//! the resulting velocity; only then does the physics tick integrate
//! positions with the fixed timestep.

use glam::Vec3;
use hecs::Entity;

use super::config::{AgentConfig, SimulationConfig};
use super::events::{EventQueue, GameEvent};
use crate::ai::{Agent, AnimationSignal, NavigationService, Target};
use crate::ecs::{Name, Transform, Velocity};

/// Owns every agent and the event queue.
pub struct Simulation {
    config: SimulationConfig,
    world: hecs::World,
    events: EventQueue,
    frame: u64,
}

impl Simulation {
    /// Events a frame can raise before the queue reallocates
    const EVENT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            world: hecs::World::new(),
            events: EventQueue::with_capacity(Self::EVENT_CAPACITY),
            frame: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spawn an agent chasing `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::UnreachableTarget`] when no path leads from the
    /// spawn point to the target. The agent is removed again before
    /// returning, so the returned entity no longer exists.
    pub fn spawn_agent(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        config: AgentConfig,
        nav: &dyn NavigationService,
        target: &dyn Target,
    ) -> Result<Entity, SpawnError> {
        let name: String = name.into();
        let entity = self.world.spawn((
            Name::new(name.as_str()),
            Agent::new(config),
            transform,
            Velocity::default(),
            AnimationSignal::Idle,
        ));

        let reachable = nav
            .find_path(transform.position, target.position())
            .is_some_and(|path| !path.is_empty());
        if !reachable {
            log::warn!("{name}: target unreachable from spawn, removing");
            // Spawned just above, so it exists
            let _ = self.world.despawn(entity);
            self.events.push(GameEvent::AgentRemoved {
                entity,
                reason: "target unreachable at spawn",
            });
            return Err(SpawnError::UnreachableTarget { entity });
        }

        log::info!("{name}: spawned at {}", transform.position);
        self.events.push(GameEvent::AgentSpawned {
            entity,
            position: transform.position,
        });
        Ok(entity)
    }

    /// Run one full frame: logic with `dt`, then physics with the fixed step.
    pub fn frame(&mut self, nav: &dyn NavigationService, target: &mut dyn Target, dt: f32) {
        self.events.swap();
        self.logic_tick(nav, target, dt);
        self.physics_tick();
        self.frame += 1;
    }

    /// Evaluate every agent, storing velocities and animation signals.
    pub fn logic_tick(&mut self, nav: &dyn NavigationService, target: &mut dyn Target, dt: f32) {
        let query = self
            .world
            .query_mut::<(&mut Agent, &mut Transform, &mut Velocity, &mut AnimationSignal)>();

        for (entity, (agent, transform, velocity, signal)) in query {
            let tick = agent.tick(transform, nav, target, dt);
            velocity.linear = tick.velocity;
            *signal = tick.signal;
            for event in tick.events {
                self.events.push(GameEvent::from_agent(entity, event));
            }
        }
    }

    /// Integrate positions from the stored velocities.
    pub fn physics_tick(&mut self) {
        let dt = self.config.fixed_timestep;
        for (_, (transform, velocity)) in self.world.query_mut::<(&mut Transform, &Velocity)>() {
            if !velocity.is_zero() {
                transform.translate(velocity.linear * dt);
            }
        }
    }

    /// Damage an agent, killing it when health runs out.
    ///
    /// Returns `true` if this blow killed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is gone or isn't an agent
    pub fn damage_agent(&mut self, entity: Entity, amount: i32) -> Result<bool, hecs::ComponentError> {
        let died = self.world.get::<&mut Agent>(entity)?.apply_damage(amount);
        if died {
            log::info!("agent {entity:?} died");
            self.events.push(GameEvent::AgentDied { entity });
        }
        Ok(died)
    }

    /// Kill an agent outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is gone or isn't an agent
    pub fn kill_agent(&mut self, entity: Entity) -> Result<(), hecs::ComponentError> {
        let mut agent = self.world.get::<&mut Agent>(entity)?;
        if !agent.is_dead() {
            agent.kill();
            self.events.push(GameEvent::AgentDied { entity });
        }
        Ok(())
    }

    /// Take an agent out of the simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity doesn't exist
    pub fn remove_agent(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.world.despawn(entity)?;
        log::info!("agent {entity:?} removed");
        self.events.push(GameEvent::AgentRemoved {
            entity,
            reason: "removed",
        });
        Ok(())
    }

    /// Check if an agent still exists
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Number of agents, dead ones included
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.world.query::<&Agent>().iter().count()
    }

    /// Number of agents still alive
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.world
            .query::<&Agent>()
            .iter()
            .filter(|(_, agent)| !agent.is_dead())
            .count()
    }

    /// Borrow an agent
    pub fn agent(&self, entity: Entity) -> Option<hecs::Ref<'_, Agent>> {
        self.world.get::<&Agent>(entity).ok()
    }

    /// Copy of an agent's transform
    #[must_use]
    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    /// Velocity computed by the last logic tick
    #[must_use]
    pub fn velocity(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<&Velocity>(entity).ok().map(|v| v.linear)
    }

    /// Animation signal from the last logic tick
    #[must_use]
    pub fn signal(&self, entity: Entity) -> Option<AnimationSignal> {
        self.world.get::<&AnimationSignal>(entity).ok().map(|s| *s)
    }

    /// Events raised during the previous frame
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Frames simulated so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Errors from spawning an agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// No path from the spawn point to the target; the agent was removed
    UnreachableTarget { entity: Entity },
}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnreachableTarget { entity } => {
                write!(f, "agent {entity:?} cannot reach its target and was removed")
            }
        }
    }
}

impl std::error::Error for SpawnError {}
