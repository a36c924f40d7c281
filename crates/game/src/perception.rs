//! Sight and contact checks shared by the NPC state machines.

use engine_core::Vec3;
use physics::{ColliderHandle, CollisionGroup, SceneQuery};

use crate::error::{non_negative, ConfigError};

/// What an observer tracks: a position plus the collider that stands for it.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub position: Vec3,
    pub collider: ColliderHandle,
}

/// View cone and range of an observer.
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    /// Full cone angle in degrees.
    pub fov_degrees: f32,
    pub detection_distance: f32,
}

impl Perception {
    pub fn new(fov_degrees: f32, detection_distance: f32) -> Result<Self, ConfigError> {
        if !(fov_degrees > 0.0 && fov_degrees <= 360.0) {
            return Err(ConfigError::FieldOfView(fov_degrees));
        }
        Ok(Self {
            fov_degrees,
            detection_distance: non_negative("detection_distance", detection_distance)?,
        })
    }

    /// True when `target` is inside the view cone, within range, and the
    /// first thing a ray from `eye` toward it runs into. Trigger volumes
    /// never occlude.
    pub fn can_see<Q: SceneQuery + ?Sized>(
        &self,
        query: &Q,
        eye: Vec3,
        forward: Vec3,
        target: &Target,
    ) -> bool {
        let to_target = target.position - eye;
        let distance = to_target.length();
        let Some(direction) = to_target.try_normalize() else {
            return false;
        };

        if angle_degrees(forward, direction) > self.fov_degrees / 2.0 {
            return false;
        }
        if distance > self.detection_distance {
            return false;
        }

        query
            .raycast(eye, direction, self.detection_distance, CollisionGroup::line_of_sight())
            .is_some_and(|hit| hit.collider == target.collider)
    }
}

/// Distance-based touch test.
pub fn is_in_contact(agent: Vec3, target: Vec3, contact_radius: f32) -> bool {
    agent.distance(target) <= contact_radius
}

/// Unsigned angle between two vectors in degrees; zero vectors give 0.
pub fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos().to_degrees(),
        _ => 0.0,
    }
}
