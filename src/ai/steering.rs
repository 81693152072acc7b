//! Waypoint-following steering
//!
//! The controller turns the agent gradually toward its next waypoint (or
//! straight at the target when nothing blocks the view) and always moves
//! along its current heading, slowing down as the heading error grows.

use glam::{Vec2, Vec3};

use super::navigation::{NavigationService, lift, planar};
use crate::core::AgentConfig;
use crate::ecs::Transform;

// ============================================================================
// Angle helpers
// ============================================================================

/// Wrap an angle into `[0, 360)` degrees.
#[must_use]
#[inline]
pub fn normalize_angle(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
#[must_use]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Rotate `current` toward `target` by at most `max_delta` degrees.
#[must_use]
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        return normalize_angle(target);
    }
    normalize_angle(current + delta.signum() * max_delta)
}

/// Heading (degrees) that faces from `from` toward `to` on the ground plane.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(d.y).to_degrees()
}

/// Unit ground-plane direction for a heading.
#[must_use]
pub fn heading_vector(yaw: f32) -> Vec2 {
    let (sin, cos) = yaw.to_radians().sin_cos();
    Vec2::new(sin, cos)
}

/// Speed multiplier for a heading error: 1 when aligned, falling linearly to
/// 0 at `threshold` degrees.
#[must_use]
pub fn speed_factor(error: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return if error.abs() <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - error.abs() / threshold).clamp(0.0, 1.0)
}

// ============================================================================
// Waypoint path
// ============================================================================

/// An immutable waypoint sequence plus a cursor into it.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vec2>,
    /// Target position the path was requested for
    destination: Vec2,
    cursor: usize,
}

impl WaypointPath {
    /// Create a path starting at its first waypoint.
    #[must_use]
    pub fn new(waypoints: Vec<Vec2>, destination: Vec2) -> Self {
        Self {
            waypoints,
            destination,
            cursor: 0,
        }
    }

    /// Skip the first waypoint when it's within `distance` of `position`
    /// and more waypoints follow it.
    #[must_use]
    pub fn starting_near(mut self, position: Vec2, distance: f32) -> Self {
        if self.waypoints.len() > 1 && self.waypoints[0].distance(position) < distance {
            self.cursor = 1;
        }
        self
    }

    /// Waypoint currently being steered toward.
    #[must_use]
    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Move the cursor to the next waypoint. Never passes the end.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.waypoints.len());
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    #[must_use]
    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

// ============================================================================
// Steering controller
// ============================================================================

/// Per-agent steering state: the active path, the moving flag and lock-on.
#[derive(Debug, Clone, Default)]
pub struct SteeringController {
    path: Option<WaypointPath>,
    moving: bool,
    lock_on: bool,
}

impl SteeringController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active path and start moving along it.
    pub fn follow(&mut self, path: WaypointPath) {
        self.path = Some(path);
        self.moving = true;
    }

    /// Stop moving but keep the path around.
    pub fn halt(&mut self) {
        self.moving = false;
    }

    /// Stop moving and drop the path.
    pub fn clear(&mut self) {
        self.moving = false;
        self.path = None;
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    #[must_use]
    pub fn is_locked_on(&self) -> bool {
        self.lock_on
    }

    #[must_use]
    pub fn path(&self) -> Option<&WaypointPath> {
        self.path.as_ref()
    }

    /// Turn the agent and compute its velocity for this tick.
    ///
    /// Waypoints within the arrival tolerance are consumed and steering is
    /// re-evaluated against the next one before returning, so several close
    /// waypoints can be passed in one tick. When the path runs out the agent
    /// stops and the path is dropped.
    pub fn steer(
        &mut self,
        transform: &mut Transform,
        target: Vec3,
        nav: &dyn NavigationService,
        config: &AgentConfig,
        dt: f32,
    ) -> Vec3 {
        if !self.moving {
            return Vec3::ZERO;
        }

        let here = transform.planar();

        // Each pass either returns or consumes a waypoint, so this runs at
        // most len + 1 times.
        loop {
            let Some(waypoint) = self.path.as_ref().and_then(WaypointPath::current) else {
                self.clear();
                return Vec3::ZERO;
            };

            let to_waypoint = here.distance(waypoint);
            let max_turn = config.turn_rate * dt;

            let desired = if nav.has_line_of_sight(transform.position, target) {
                let desired = bearing(here, planar(target));
                self.lock_on = false;
                if to_waypoint > config.settle_epsilon {
                    transform.set_yaw(move_towards_angle(transform.yaw, desired, max_turn));
                }
                desired
            } else {
                let desired = bearing(here, waypoint);
                if self.lock_on {
                    transform.set_yaw(desired);
                } else if !nav.is_cell_occupied(transform.position) {
                    if delta_angle(transform.yaw, desired).abs() < config.lock_on_tolerance {
                        self.lock_on = true;
                    }
                    transform.set_yaw(move_towards_angle(transform.yaw, desired, max_turn));
                } else if to_waypoint > config.settle_epsilon {
                    transform.set_yaw(move_towards_angle(transform.yaw, desired, max_turn));
                }
                desired
            };

            if to_waypoint < config.arrival_tolerance {
                if let Some(path) = self.path.as_mut() {
                    path.advance();
                }
                continue;
            }

            let error = delta_angle(transform.yaw, desired);
            let speed = config.max_speed * speed_factor(error, config.attenuation_angle);
            return lift(heading_vector(transform.yaw) * speed, 0.0);
        }
    }
}
