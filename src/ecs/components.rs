//! Common ECS components

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ai::{heading_vector, normalize_angle};

/// Ground-bound transform: world position plus a yaw heading.
///
/// Yaw is in degrees, 0° facing +Z and 90° facing +X. Agents never pitch or
/// roll, so nothing else is stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Heading in degrees, kept in `[0, 360)`
    pub yaw: f32,
}

impl Transform {
    /// Create a transform at the origin facing +Z
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the heading
    #[must_use]
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.set_yaw(yaw);
        self
    }

    /// Set the heading, wrapping it into `[0, 360)`
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = normalize_angle(yaw);
    }

    /// Position projected onto the ground plane (x, z)
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Unit direction the transform is facing, on the ground plane
    pub fn forward(&self) -> Vec3 {
        let dir = heading_vector(self.yaw);
        Vec3::new(dir.x, 0.0, dir.y)
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

/// Linear velocity handed from the logic tick to the physics tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    /// Whether the integrator has anything to apply
    pub fn is_zero(&self) -> bool {
        self.linear == Vec3::ZERO
    }
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_follows_yaw() {
        let north = Transform::new();
        assert!((north.forward() - Vec3::Z).length() < 1e-5);

        let east = Transform::new().with_yaw(90.0);
        assert!((east.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_yaw_wraps() {
        let t = Transform::new().with_yaw(-90.0);
        assert!((t.yaw - 270.0).abs() < 1e-4);

        let t = Transform::new().with_yaw(720.0 + 45.0);
        assert!((t.yaw - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_planar_and_translate() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::new(0.5, 0.0, -1.0));

        assert_eq!(t.planar(), Vec2::new(1.5, 2.0));
    }

    #[test]
    fn test_velocity_zero() {
        assert!(Velocity::default().is_zero());
        assert!(!Velocity { linear: Vec3::X }.is_zero());
    }
}
