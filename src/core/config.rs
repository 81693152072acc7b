//! Agent and simulation configuration
//!
//! Both structs deserialize with `#[serde(default)]`, so scene files only
//! need to name the values they override.

use serde::{Deserialize, Serialize};

/// Tunables for one pursuing agent.
///
/// Distances are world units, angles degrees, times seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Starting health (clamped to at least 1 when the agent is created)
    pub health: i32,
    /// Maximum linear speed (units per second)
    pub max_speed: f32,
    /// Maximum turn rate (degrees per second)
    pub turn_rate: f32,
    /// Distance under which the target is noticed
    pub detection_radius: f32,
    /// Start already alert
    pub start_alert: bool,
    /// Distance at which approaching stops and the attack wind-up begins
    pub near_threshold: f32,
    /// Maximum distance at which a strike connects
    pub strike_range: f32,
    /// Wind-up between reaching the target and striking
    pub attack_delay: f32,
    /// Damage applied per connecting strike
    pub attack_damage: i32,
    /// Target drift from the path destination that triggers a re-plan
    pub repath_tolerance: f32,
    /// Idle time after a failed path request before retrying
    pub recover_delay: f32,
    /// Distance under which a waypoint counts as reached
    pub arrival_tolerance: f32,
    /// Distance under which turning toward a waypoint is skipped
    pub settle_epsilon: f32,
    /// Heading error under which steering locks on
    pub lock_on_tolerance: f32,
    /// Heading error at which speed drops to zero
    pub attenuation_angle: f32,
    /// A first waypoint closer than this is skipped
    pub short_circuit_distance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            health: 10,
            max_speed: 3.0,
            turn_rate: 240.0,
            detection_radius: 10.0,
            start_alert: false,
            near_threshold: 3.0,
            strike_range: 5.0,
            attack_delay: 1.0,
            attack_damage: 1,
            repath_tolerance: 1.0,
            recover_delay: 1.0,
            arrival_tolerance: 0.2,
            settle_epsilon: 0.05,
            lock_on_tolerance: 10.0,
            attenuation_angle: 30.0,
            short_circuit_distance: 2.5,
        }
    }
}

impl AgentConfig {
    /// Set starting health
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Set linear speed and turn rate
    #[must_use]
    pub fn with_speed(mut self, max_speed: f32, turn_rate: f32) -> Self {
        self.max_speed = max_speed;
        self.turn_rate = turn_rate;
        self
    }

    /// Set the detection radius
    #[must_use]
    pub fn with_detection_radius(mut self, radius: f32) -> Self {
        self.detection_radius = radius;
        self
    }

    /// Set attack wind-up and damage
    #[must_use]
    pub fn with_attack(mut self, delay: f32, damage: i32) -> Self {
        self.attack_delay = delay;
        self.attack_damage = damage;
        self
    }

    /// Set the delay before retrying after a failed path request
    #[must_use]
    pub fn with_recover_delay(mut self, delay: f32) -> Self {
        self.recover_delay = delay;
        self
    }

    /// Start the agent already alert
    #[must_use]
    pub fn starting_alert(mut self) -> Self {
        self.start_alert = true;
        self
    }
}

/// Simulation-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Elapsed time used by every physics tick
    pub fixed_timestep: f32,
    /// Upper bound on frames the demo runner simulates
    pub max_frames: u32,
    /// Config used for spawns that don't carry their own
    pub default_agent: AgentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_frames: 3600,
            default_agent: AgentConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Set the physics timestep
    #[must_use]
    pub fn with_fixed_timestep(mut self, dt: f32) -> Self {
        self.fixed_timestep = dt;
        self
    }

    /// Set the frame limit
    #[must_use]
    pub fn with_max_frames(mut self, frames: u32) -> Self {
        self.max_frames = frames;
        self
    }

    /// Set the agent config used by default
    #[must_use]
    pub fn with_default_agent(mut self, agent: AgentConfig) -> Self {
        self.default_agent = agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = AgentConfig::default()
            .with_health(4)
            .with_speed(5.0, 90.0)
            .with_attack(0.5, 2)
            .starting_alert();

        assert_eq!(config.health, 4);
        assert!((config.max_speed - 5.0).abs() < f32::EPSILON);
        assert!((config.turn_rate - 90.0).abs() < f32::EPSILON);
        assert_eq!(config.attack_damage, 2);
        assert!(config.start_alert);
        // Untouched values keep their defaults
        assert!((config.strike_range - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: AgentConfig = ron::from_str("(max_speed: 6.5, start_alert: true)").unwrap();

        assert!((config.max_speed - 6.5).abs() < f32::EPSILON);
        assert!(config.start_alert);
        assert_eq!(config.health, AgentConfig::default().health);
    }

    #[test]
    fn test_simulation_config_json() {
        let config = SimulationConfig::default().with_fixed_timestep(0.02);

        let json = serde_json::to_string(&config).unwrap();
        let loaded: SimulationConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, config);
    }
}
