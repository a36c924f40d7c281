//! Geometry queries consumed by the gameplay logic.
//!
//! NPC and spawner code is generic over [`SceneQuery`] so it can run against
//! the Rapier-backed [`PhysicsWorld`] or a hand-built scene in tests.

use crate::collision::CollisionGroup;
use crate::raycast::RaycastHit;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::Group;

/// Height above which downward ground probes start.
pub const GROUND_PROBE_TOP: f32 = 1000.0;

/// Downward probe length used by [`SceneQuery::ground_height`].
pub const GROUND_PROBE_LENGTH: f32 = 2000.0;

/// Read-only view of the arena geometry.
pub trait SceneQuery {
    /// First hit along a ray against colliders on `layers`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: Group,
    ) -> Option<RaycastHit>;

    /// Terrain height under `(x, z)`, or `None` when there is no ground there.
    fn ground_height(&self, x: f32, z: f32) -> Option<f32> {
        self.raycast(
            Vec3::new(x, GROUND_PROBE_TOP, z),
            -Vec3::Y,
            GROUND_PROBE_LENGTH,
            CollisionGroup::Ground.mask(),
        )
        .map(|hit| hit.point.y)
    }

    /// Closest walkable point to `point`, searched within `max_radius`.
    ///
    /// Walkable means ground directly beneath or above the point, no further
    /// than `max_radius` vertically.
    fn sample_nearest_walkable(&self, point: Vec3, max_radius: f32) -> Option<Vec3> {
        let origin = point + Vec3::Y * max_radius;
        self.raycast(origin, -Vec3::Y, max_radius * 2.0, CollisionGroup::Ground.mask())
            .map(|hit| hit.point)
    }
}

impl SceneQuery for PhysicsWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: Group,
    ) -> Option<RaycastHit> {
        PhysicsWorld::raycast(self, origin, direction, max_distance, layers)
    }
}
