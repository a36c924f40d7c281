//! Transform component and utilities for spatial positioning.
//!
//! Agents in the arena only ever rotate about the vertical axis, so besides
//! the usual direction helpers this module exposes yaw accessors. Yaw is in
//! radians, counter-clockwise when seen from above, with yaw 0 facing -Z.

use glam::{EulerRot, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform at the given position facing the given yaw.
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Current heading about the Y axis.
    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }

    /// Replace the rotation with a pure heading.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
    }

    /// Drop any pitch/roll, keeping only the heading.
    pub fn flatten_to_yaw(&mut self) {
        let yaw = self.yaw();
        self.set_yaw(yaw);
    }

    /// Rotate the heading toward `direction` by interpolation factor `t`
    /// (clamped to `0..=1`). Directions with no horizontal component are ignored.
    pub fn turn_towards(&mut self, direction: Vec3, t: f32) {
        let Some(target_yaw) = yaw_for_direction(direction) else {
            return;
        };
        let target = Quat::from_rotation_y(target_yaw);
        self.rotation = self.rotation.slerp(target, t.clamp(0.0, 1.0));
    }
}

/// Heading whose forward vector points along the horizontal part of `direction`.
pub fn yaw_for_direction(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some((-flat.x).atan2(-flat.z))
}
