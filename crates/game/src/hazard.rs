//! Hazard entities and their motion routines.

use engine_core::{Tint, Transform, Vec3};
use physics::SceneQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    /// Rises out of the terrain, then slides after the target.
    GroundFollow,
    /// Drops from the sky until it reaches the terrain.
    SkyFall,
}

/// Marker component for spawned hazards.
#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub kind: HazardKind,
}

/// Per-hazard motion state. Only [`HazardMotion::step`] writes a hazard's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardMotion {
    Rising { elapsed: f32, start_y: f32 },
    Following,
    Falling,
}

/// What a motion step decided for its hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    Continue,
    Destroy,
}

/// Shared inputs for one tick of hazard motion.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext {
    pub target: Vec3,
    pub follow_speed: f32,
    pub fall_speed: f32,
    pub rise_height: f32,
    pub rise_duration: f32,
    pub kill_floor_y: f32,
    pub dt: f32,
}

impl HazardMotion {
    pub fn step<Q: SceneQuery + ?Sized>(
        &mut self,
        transform: &mut Transform,
        ctx: &MotionContext,
        query: &Q,
    ) -> MotionOutcome {
        match *self {
            HazardMotion::Rising { elapsed, start_y } => {
                let elapsed = elapsed + ctx.dt;
                let t = (elapsed / ctx.rise_duration).min(1.0);
                transform.position.y = start_y + ctx.rise_height * t;
                *self = if t >= 1.0 {
                    HazardMotion::Following
                } else {
                    HazardMotion::Rising { elapsed, start_y }
                };
                MotionOutcome::Continue
            }
            HazardMotion::Following => {
                let offset = ctx.target - transform.position;
                let direction = Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero();
                transform.position += direction * ctx.follow_speed * ctx.dt;
                MotionOutcome::Continue
            }
            HazardMotion::Falling => {
                transform.position.y -= ctx.fall_speed * ctx.dt;
                let p = transform.position;
                match query.ground_height(p.x, p.z) {
                    Some(ground) if p.y <= ground => MotionOutcome::Destroy,
                    None if p.y < ctx.kill_floor_y => MotionOutcome::Destroy,
                    _ => MotionOutcome::Continue,
                }
            }
        }
    }
}

/// Components of a freshly spawned hazard.
pub struct HazardBundle {
    pub transform: Transform,
    pub tint: Tint,
    pub hazard: Hazard,
    pub motion: HazardMotion,
}

impl HazardBundle {
    /// Ground hazard emerging at `position` (on the terrain surface).
    pub fn ground(position: Vec3, tint: Tint) -> Self {
        Self {
            transform: Transform::from_position(position),
            tint,
            hazard: Hazard {
                kind: HazardKind::GroundFollow,
            },
            motion: HazardMotion::Rising {
                elapsed: 0.0,
                start_y: position.y,
            },
        }
    }

    /// Sky hazard starting its fall at `position`.
    pub fn sky(position: Vec3, tint: Tint) -> Self {
        Self {
            transform: Transform::from_position(position),
            tint,
            hazard: Hazard {
                kind: HazardKind::SkyFall,
            },
            motion: HazardMotion::Falling,
        }
    }

    /// Spawn into the ECS world.
    pub fn spawn(self, world: &mut hecs::World) -> hecs::Entity {
        world.spawn((self.transform, self.tint, self.hazard, self.motion))
    }
}
