//! Raycasting for sight lines, wall probes and ground sampling.

use crate::collision::CollisionGroup;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Layer of the hit collider, if it belongs to a known one.
    pub layer: Option<CollisionGroup>,
    /// Whether the hit collider is a sensor volume.
    pub is_trigger: bool,
}

impl RaycastHit {
    /// True when the hit is terrain rather than an obstacle.
    pub fn is_ground(&self) -> bool {
        self.layer == Some(CollisionGroup::Ground)
    }
}

impl PhysicsWorld {
    /// Cast a ray against colliders whose membership intersects `layers` and
    /// return the first hit. Sensors are included; zero-length directions miss.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: Group,
    ) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let filter = QueryFilter::default().groups(InteractionGroups::new(Group::ALL, layers));

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                let (layer, is_trigger) = self
                    .collider_set
                    .get(collider)
                    .map(|c| {
                        (
                            CollisionGroup::from_memberships(c.collision_groups().memberships),
                            c.is_sensor(),
                        )
                    })
                    .unwrap_or((None, false));
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                    layer,
                    is_trigger,
                }
            })
    }
}
