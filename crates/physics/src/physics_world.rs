//! Physics world management with Rapier3D.
//!
//! Only colliders and the query pipeline are used: static terrain and walls,
//! sensor volumes, and a parentless player capsule that gameplay code
//! teleports every tick. Callers must run [`PhysicsWorld::update_query_pipeline`]
//! after moving or inserting colliders for ray casts to see the change.

use crate::collision::CollisionGroup;
use engine_core::Vec3;
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;

/// Main physics world containing all query state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty physics world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(CollisionGroup::ground())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid obstacle (walls, pillars). No parent body; collider is fixed in world.
    /// `translation`: world position of center. `rotation_y_rad`: rotation around Y axis in radians.
    /// `half_extents`: half sizes in local X, Y, Z (after rotation).
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation_y_rad: f32,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let tra = vector![translation.x, translation.y, translation.z];
        let axisangle = Vector3::y_axis().into_inner() * (rotation_y_rad as Real);
        let position = Isometry3::new(tra, axisangle);
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(position)
        .collision_groups(CollisionGroup::environment())
        .build();
        self.collider_set.insert(collider)
    }

    /// Add an axis-aligned sensor box. Ray casts report hits on it with `is_trigger` set.
    pub fn add_trigger_cuboid(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .sensor(true)
            .collision_groups(CollisionGroup::trigger())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add the player's capsule collider (good for characters).
    pub fn add_player_capsule(
        &mut self,
        position: Vec3,
        half_height: f32,
        radius: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(CollisionGroup::player())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a heightfield collider for the arena terrain.
    /// - `heights`: flat slice of height values in world Y, row-major order (index = z * ncols + x).
    /// - `nrows`, `ncols`: grid dimensions (must be at least 2 each).
    /// - `size_x`, `size_z`: total extent in world units (terrain spans -size/2 to +size/2 in X and Z).
    ///
    /// Returns `None` when the grid is too small or the slice too short.
    pub fn add_terrain_heightfield(
        &mut self,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        size_x: f32,
        size_z: f32,
    ) -> Option<ColliderHandle> {
        if nrows < 2 || ncols < 2 || heights.len() < nrows * ncols {
            log::warn!(
                "Terrain heightfield rejected: {}x{} grid with {} samples",
                nrows,
                ncols,
                heights.len()
            );
            return None;
        }

        let heights_matrix = DMatrix::from_fn(nrows, ncols, |i, j| heights[i * ncols + j] as Real);
        let scale = vector![size_x, 1.0, size_z];

        let collider = ColliderBuilder::heightfield(heights_matrix, scale)
            .collision_groups(CollisionGroup::ground())
            .build();
        Some(self.collider_set.insert(collider))
    }

    /// Move a parentless collider. Returns false when the handle is stale.
    pub fn set_collider_translation(&mut self, handle: ColliderHandle, position: Vec3) -> bool {
        match self.collider_set.get_mut(handle) {
            Some(collider) => {
                collider.set_translation(vector![position.x, position.y, position.z]);
                true
            }
            None => false,
        }
    }

    /// World position of a collider.
    pub fn collider_translation(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).map(|collider| {
            let t = collider.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }
}
