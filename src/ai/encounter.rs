//! Encounter state machine
//!
//! Drives one agent through its pursuit cycle:
//!
//! ```text
//! Idle ──alert──▶ AlertSeeking ──path──▶ Approaching ──near──▶ Attacking
//!                      ▲                     ▲   │                 │
//!                      │                     │   └──no path──┐     │
//!                      │                     └───────────────┼─────┘
//!                 Recovering ◀──────────no path──────────────┘
//! ```
//!
//! Each phase has an enter hook and an update that returns a [`Transition`].
//! A hand-off into `AlertSeeking` is acted on in the same tick, so the path
//! request never waits a frame.

use std::fmt;

use glam::Vec3;
use smallvec::SmallVec;

use super::agent::{AgentEvent, AnimationSignal};
use super::navigation::{NavigationService, planar};
use super::perception::Perception;
use super::steering::{SteeringController, WaypointPath};
use super::target::Target;
use crate::core::AgentConfig;

// ============================================================================
// Phases and transitions
// ============================================================================

/// The encounter phase an agent is in. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncounterPhase {
    /// Target not perceived yet, or not targetable
    #[default]
    Idle,
    /// Alert and about to request a path
    AlertSeeking,
    /// Following a path toward the target
    Approaching,
    /// Winding up a strike
    Attacking,
    /// Waiting after a failed path request
    Recovering,
}

impl EncounterPhase {
    /// Phase name for debugging and logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AlertSeeking => "AlertSeeking",
            Self::Approaching => "Approaching",
            Self::Attacking => "Attacking",
            Self::Recovering => "Recovering",
        }
    }
}

impl fmt::Display for EncounterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a phase update stays put or hands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stay in the current phase.
    None,
    /// Switch to another phase.
    To(EncounterPhase),
}

/// Everything a phase update may read or touch during one tick.
pub struct EncounterContext<'a> {
    pub config: &'a AgentConfig,
    /// Agent position at the start of the tick
    pub position: Vec3,
    pub target: &'a mut dyn Target,
    pub nav: &'a dyn NavigationService,
    pub steering: &'a mut SteeringController,
    pub perception: &'a mut Perception,
    pub delta_time: f32,
    /// Events raised this tick
    pub events: &'a mut SmallVec<[AgentEvent; 4]>,
    /// Animation signal chosen by the last phase update
    pub signal: AnimationSignal,
}

impl EncounterContext<'_> {
    fn distance_to_target(&self) -> f32 {
        planar(self.position).distance(planar(self.target.position()))
    }

    /// Ask for a fresh path to the target's current position.
    fn request_path(&mut self) -> Transition {
        let destination = self.target.position();
        let path = self
            .nav
            .find_path(self.position, destination)
            .filter(|waypoints| !waypoints.is_empty());

        match path {
            Some(waypoints) => {
                log::debug!(
                    "path of {} waypoints toward ({:.1}, {:.1})",
                    waypoints.len(),
                    destination.x,
                    destination.z
                );
                self.steering.follow(
                    WaypointPath::new(waypoints, planar(destination))
                        .starting_near(planar(self.position), self.config.short_circuit_distance),
                );
                Transition::To(EncounterPhase::Approaching)
            }
            None => {
                log::debug!("no path toward ({:.1}, {:.1})", destination.x, destination.z);
                self.steering.clear();
                self.events.push(AgentEvent::PathUnavailable);
                Transition::To(EncounterPhase::Recovering)
            }
        }
    }
}

// ============================================================================
// Machine
// ============================================================================

/// Current phase plus the countdown used by `Attacking` and `Recovering`.
#[derive(Debug, Clone, Default)]
pub struct EncounterMachine {
    phase: EncounterPhase,
    timer: f32,
}

impl EncounterMachine {
    /// Bound on phase updates per tick: one regular update plus one for a
    /// same-tick `AlertSeeking` hand-off.
    const MAX_STEPS: usize = 2;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    #[must_use]
    pub fn is_in(&self, phase: EncounterPhase) -> bool {
        self.phase == phase
    }

    /// Remaining countdown of the current phase.
    #[must_use]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Run the current phase for one tick, switching phases as it asks.
    pub fn update(&mut self, ctx: &mut EncounterContext<'_>) {
        for _ in 0..Self::MAX_STEPS {
            let Transition::To(next) = self.step(ctx) else {
                return;
            };
            if next == self.phase {
                return;
            }

            log::debug!("encounter {} -> {}", self.phase, next);
            ctx.events.push(AgentEvent::PhaseChanged {
                from: self.phase,
                to: next,
            });
            self.phase = next;
            self.enter(ctx.steering, ctx.config);

            if next != EncounterPhase::AlertSeeking {
                return;
            }
        }
    }

    /// Switch phase immediately, running its enter hook.
    pub fn force(&mut self, phase: EncounterPhase, steering: &mut SteeringController, config: &AgentConfig) {
        self.phase = phase;
        self.enter(steering, config);
    }

    fn enter(&mut self, steering: &mut SteeringController, config: &AgentConfig) {
        self.timer = 0.0;
        match self.phase {
            EncounterPhase::Idle => steering.clear(),
            EncounterPhase::Attacking => {
                steering.halt();
                self.timer = config.attack_delay;
            }
            EncounterPhase::Recovering => {
                steering.clear();
                self.timer = config.recover_delay;
            }
            EncounterPhase::AlertSeeking | EncounterPhase::Approaching => {}
        }
    }

    fn step(&mut self, ctx: &mut EncounterContext<'_>) -> Transition {
        match self.phase {
            EncounterPhase::Idle => Self::idle(ctx),
            EncounterPhase::AlertSeeking => Self::seek(ctx),
            EncounterPhase::Approaching => Self::approach(ctx),
            EncounterPhase::Attacking => self.attack(ctx),
            EncounterPhase::Recovering => self.recover(ctx),
        }
    }

    fn idle(ctx: &mut EncounterContext<'_>) -> Transition {
        ctx.signal = AnimationSignal::Idle;
        if !ctx.target.can_be_targeted() {
            return Transition::None;
        }

        if ctx.perception.is_alert() {
            return Transition::To(EncounterPhase::AlertSeeking);
        }

        let noticed = ctx.perception.observe(
            ctx.position,
            ctx.target.position(),
            ctx.config.detection_radius,
        );
        if noticed {
            log::info!(
                "target noticed at {:.1} units",
                ctx.position.distance(ctx.target.position())
            );
            ctx.events.push(AgentEvent::Alerted);
            return Transition::To(EncounterPhase::AlertSeeking);
        }
        Transition::None
    }

    fn seek(ctx: &mut EncounterContext<'_>) -> Transition {
        ctx.signal = AnimationSignal::Idle;
        if !ctx.target.can_be_targeted() {
            return Transition::To(EncounterPhase::Idle);
        }
        ctx.request_path()
    }

    fn approach(ctx: &mut EncounterContext<'_>) -> Transition {
        ctx.signal = AnimationSignal::Walk;
        if !ctx.target.can_be_targeted() {
            return Transition::To(EncounterPhase::Idle);
        }

        if ctx.distance_to_target() <= ctx.config.near_threshold {
            return Transition::To(EncounterPhase::Attacking);
        }

        // Path ran out before getting close
        if !ctx.steering.is_moving() {
            return ctx.request_path();
        }

        let drift = ctx
            .steering
            .path()
            .map_or(f32::INFINITY, |path| {
                path.destination().distance(planar(ctx.target.position()))
            });
        if drift > ctx.config.repath_tolerance {
            return ctx.request_path();
        }
        Transition::None
    }

    fn attack(&mut self, ctx: &mut EncounterContext<'_>) -> Transition {
        ctx.signal = AnimationSignal::Attack;
        if !ctx.target.can_be_targeted() {
            return Transition::To(EncounterPhase::Idle);
        }

        self.timer -= ctx.delta_time;
        if self.timer > 0.0 {
            return Transition::None;
        }

        let distance = ctx.distance_to_target();
        if distance <= ctx.config.strike_range {
            let amount = ctx.config.attack_damage;
            ctx.target.apply_damage(amount);
            ctx.target.flinch();
            ctx.events.push(AgentEvent::Struck { amount });
            log::debug!("strike landed at {distance:.1} units for {amount}");
        } else {
            log::debug!("strike missed at {distance:.1} units");
        }

        // Hit or miss, go after the target again
        ctx.request_path()
    }

    fn recover(&mut self, ctx: &mut EncounterContext<'_>) -> Transition {
        ctx.signal = AnimationSignal::Idle;
        if !ctx.target.can_be_targeted() {
            return Transition::To(EncounterPhase::Idle);
        }

        self.timer -= ctx.delta_time;
        if self.timer > 0.0 {
            return Transition::None;
        }
        Transition::To(EncounterPhase::AlertSeeking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::target::Player;
    use crate::ai::test_support::FakeNav;

    struct Harness {
        config: AgentConfig,
        machine: EncounterMachine,
        steering: SteeringController,
        perception: Perception,
        events: SmallVec<[AgentEvent; 4]>,
    }

    impl Harness {
        fn new(config: AgentConfig) -> Self {
            Self {
                perception: Perception::new(config.start_alert),
                config,
                machine: EncounterMachine::new(),
                steering: SteeringController::new(),
                events: SmallVec::new(),
            }
        }

        fn update(&mut self, nav: &FakeNav, player: &mut Player, dt: f32) -> AnimationSignal {
            self.events.clear();
            let mut ctx = EncounterContext {
                config: &self.config,
                position: Vec3::ZERO,
                target: player,
                nav,
                steering: &mut self.steering,
                perception: &mut self.perception,
                delta_time: dt,
                events: &mut self.events,
                signal: AnimationSignal::Idle,
            };
            self.machine.update(&mut ctx);
            ctx.signal
        }
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(EncounterPhase::default().name(), "Idle");
        assert_eq!(EncounterPhase::Recovering.to_string(), "Recovering");
    }

    #[test]
    fn test_stays_idle_until_noticed() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(20.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().with_detection_radius(5.0));

        let signal = harness.update(&nav, &mut player, 0.1);

        assert!(harness.machine.is_in(EncounterPhase::Idle));
        assert_eq!(signal, AnimationSignal::Idle);
        assert_eq!(nav.requests(), 0);
    }

    #[test]
    fn test_noticing_requests_path_same_tick() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default());

        harness.update(&nav, &mut player, 0.1);

        assert!(harness.machine.is_in(EncounterPhase::Approaching));
        assert!(harness.steering.is_moving());
        assert_eq!(nav.requests(), 1);
        assert!(harness.events.contains(&AgentEvent::Alerted));
        assert!(harness.events.contains(&AgentEvent::PhaseChanged {
            from: EncounterPhase::AlertSeeking,
            to: EncounterPhase::Approaching,
        }));
    }

    #[test]
    fn test_close_target_starts_attack_wind_up() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().starting_alert());
        harness.update(&nav, &mut player, 0.1);

        player.position = Vec3::new(2.5, 0.0, 0.0);
        harness.update(&nav, &mut player, 0.1);

        assert!(harness.machine.is_in(EncounterPhase::Attacking));
        assert!(!harness.steering.is_moving());
        assert!((harness.machine.timer() - harness.config.attack_delay).abs() < 1e-6);
    }

    #[test]
    fn test_wind_up_counts_down() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(2.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().with_attack(1.0, 1).starting_alert());
        harness
            .machine
            .force(EncounterPhase::Attacking, &mut harness.steering, &harness.config);

        let signal = harness.update(&nav, &mut player, 0.4);
        assert_eq!(signal, AnimationSignal::Attack);
        assert!(harness.machine.is_in(EncounterPhase::Attacking));
        assert_eq!(player.health(), 5);

        harness.update(&nav, &mut player, 0.7);
        assert!(harness.machine.is_in(EncounterPhase::Approaching));
        assert_eq!(player.health(), 4);
    }

    #[test]
    fn test_failed_request_recovers_then_retries() {
        let unreachable = FakeNav::unreachable();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().with_recover_delay(0.5).starting_alert());

        harness.update(&unreachable, &mut player, 0.1);
        assert!(harness.machine.is_in(EncounterPhase::Recovering));
        assert!(harness.events.contains(&AgentEvent::PathUnavailable));
        assert!(!harness.steering.is_moving());

        // Still waiting: no new request
        harness.update(&unreachable, &mut player, 0.2);
        assert_eq!(unreachable.requests(), 1);

        let reachable = FakeNav::blocked();
        harness.update(&reachable, &mut player, 0.4);
        assert!(harness.machine.is_in(EncounterPhase::Approaching));
        assert_eq!(reachable.requests(), 1);
    }

    #[test]
    fn test_spent_path_out_of_range_replans_once() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().starting_alert());
        harness.update(&nav, &mut player, 0.1);
        assert_eq!(nav.requests(), 1);

        // Steering used the whole path up
        harness.steering.clear();
        harness.update(&nav, &mut player, 0.1);
        assert!(harness.machine.is_in(EncounterPhase::Approaching));
        assert!(harness.steering.is_moving());
        assert_eq!(nav.requests(), 2);

        harness.update(&nav, &mut player, 0.1);
        assert_eq!(nav.requests(), 2);
    }

    #[test]
    fn test_spent_path_in_range_attacks() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().starting_alert());
        harness.update(&nav, &mut player, 0.1);

        player.position = Vec3::new(0.1, 0.0, 0.0);
        harness.steering.clear();
        harness.update(&nav, &mut player, 0.1);

        assert!(harness.machine.is_in(EncounterPhase::Attacking));
        assert_eq!(nav.requests(), 1);
    }

    #[test]
    fn test_untargetable_target_drops_to_idle() {
        let nav = FakeNav::blocked();
        let mut player = Player::new(Vec3::new(8.0, 0.0, 0.0), 5);
        let mut harness = Harness::new(AgentConfig::default().starting_alert());
        harness.update(&nav, &mut player, 0.1);
        assert!(harness.machine.is_in(EncounterPhase::Approaching));

        player.set_active(false);
        harness.update(&nav, &mut player, 0.1);
        assert!(harness.machine.is_in(EncounterPhase::Idle));
        assert!(harness.steering.path().is_none());

        player.set_active(true);
        harness.update(&nav, &mut player, 0.1);
        assert!(harness.machine.is_in(EncounterPhase::Approaching));
    }
}
