//! Escalating hazard spawning.
//!
//! Two streams run while the target stands inside the spawn bounds: ground
//! hazards that rise from the terrain and chase the target, and sky hazards
//! that drop onto the arena. Both intervals shrink linearly with session time
//! toward a shared floor, and ground hazards speed up the longer it lasts.

use engine_core::{Tint, Transform, Vec3};
use hecs::{Entity, World};
use physics::SceneQuery;
use rand::prelude::*;

use crate::config::SpawnerConfig;
use crate::error::{non_negative, positive, ConfigError};
use crate::hazard::{Hazard, HazardBundle, HazardKind, HazardMotion, MotionContext, MotionOutcome};
use crate::player::HitReceiver;

/// Spawn interval `t` seconds into the session.
pub fn decayed_rate(initial: f32, decrease_per_second: f32, floor: f32, t: f32) -> f32 {
    (initial - decrease_per_second * t).max(floor)
}

/// Owns every live hazard and the escalation clock.
pub struct HazardSpawner {
    config: SpawnerConfig,
    min_bounds: Vec3,
    max_bounds: Vec3,

    /// Session time (seconds).
    pub time_elapsed: f32,
    ground_timer: f32,
    sky_timer: f32,
    ground_rate: f32,
    sky_rate: f32,
    follow_speed: f32,

    /// Tint given to hazards, live and future.
    hazard_tint: Tint,
    /// Live hazards. Entries leave this list only when their entity is despawned.
    live: Vec<Entity>,

    rng: StdRng,
}

impl HazardSpawner {
    pub fn new(config: &SpawnerConfig, rng: StdRng) -> Result<Self, ConfigError> {
        let (min, max) = (config.min_bounds, config.max_bounds);
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(ConfigError::InvertedBounds { min, max });
        }
        positive("initial_ground_rate", config.initial_ground_rate)?;
        positive("initial_sky_rate", config.initial_sky_rate)?;
        positive("min_rate", config.min_rate)?;
        positive("rise_duration", config.rise_duration)?;
        non_negative("ground_rate_increase", config.ground_rate_increase)?;
        non_negative("sky_rate_increase", config.sky_rate_increase)?;
        non_negative("initial_follow_speed", config.initial_follow_speed)?;
        non_negative("follow_speed_increase", config.follow_speed_increase)?;
        non_negative("fall_speed", config.fall_speed)?;
        non_negative("hit_radius", config.hit_radius)?;

        Ok(Self {
            config: config.clone(),
            min_bounds: Vec3::from_array(min),
            max_bounds: Vec3::from_array(max),
            time_elapsed: 0.0,
            ground_timer: 0.0,
            sky_timer: 0.0,
            ground_rate: config.initial_ground_rate,
            sky_rate: config.initial_sky_rate,
            follow_speed: config.initial_follow_speed,
            hazard_tint: Tint::WHITE,
            live: Vec::new(),
            rng,
        })
    }

    pub fn ground_rate(&self) -> f32 {
        self.ground_rate
    }

    pub fn sky_rate(&self) -> f32 {
        self.sky_rate
    }

    pub fn follow_speed(&self) -> f32 {
        self.follow_speed
    }

    pub fn hazard_tint(&self) -> Tint {
        self.hazard_tint
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn hazards(&self) -> &[Entity] {
        &self.live
    }

    /// True when `point` lies inside the spawn bounds (inclusive).
    pub fn in_bounds(&self, point: Vec3) -> bool {
        point.cmpge(self.min_bounds).all() && point.cmple(self.max_bounds).all()
    }

    /// Advance rates, emit due hazards and move every live hazard.
    pub fn update<Q: SceneQuery + ?Sized>(&mut self, world: &mut World, query: &Q, target: Vec3, dt: f32) {
        self.time_elapsed += dt;
        self.update_rates();

        if self.in_bounds(target) {
            self.ground_timer += dt;
            if self.ground_timer >= self.ground_rate {
                self.ground_timer = 0.0;
                self.spawn_ground_hazard(world, query);
            }

            self.sky_timer += dt;
            if self.sky_timer >= self.sky_rate {
                self.sky_timer = 0.0;
                self.spawn_sky_hazard(world);
            }
        }

        self.move_hazards(world, query, target, dt);
    }

    fn update_rates(&mut self) {
        let c = &self.config;
        let t = self.time_elapsed;
        self.ground_rate = decayed_rate(c.initial_ground_rate, c.ground_rate_increase, c.min_rate, t);
        self.sky_rate = decayed_rate(c.initial_sky_rate, c.sky_rate_increase, c.min_rate, t);
        self.follow_speed = c.initial_follow_speed + c.follow_speed_increase * t;
    }

    fn random_xz(&mut self) -> (f32, f32) {
        let x = self.rng.gen_range(self.min_bounds.x..=self.max_bounds.x);
        let z = self.rng.gen_range(self.min_bounds.z..=self.max_bounds.z);
        (x, z)
    }

    fn spawn_ground_hazard<Q: SceneQuery + ?Sized>(&mut self, world: &mut World, query: &Q) -> Option<Entity> {
        let (x, z) = self.random_xz();
        let Some(ground) = query.ground_height(x, z) else {
            log::debug!("No terrain under ({:.1}, {:.1}), skipping ground hazard", x, z);
            return None;
        };
        let entity = HazardBundle::ground(Vec3::new(x, ground, z), self.hazard_tint).spawn(world);
        self.live.push(entity);
        log::debug!("Ground hazard at ({:.1}, {:.1}), {} live", x, z, self.live.len());
        Some(entity)
    }

    fn spawn_sky_hazard(&mut self, world: &mut World) -> Entity {
        let (x, z) = self.random_xz();
        let position = Vec3::new(x, self.config.sky_spawn_height, z);
        let entity = HazardBundle::sky(position, self.hazard_tint).spawn(world);
        self.live.push(entity);
        log::debug!("Sky hazard at ({:.1}, {:.1}), {} live", x, z, self.live.len());
        entity
    }

    fn move_hazards<Q: SceneQuery + ?Sized>(&mut self, world: &mut World, query: &Q, target: Vec3, dt: f32) {
        let ctx = MotionContext {
            target,
            follow_speed: self.follow_speed,
            fall_speed: self.config.fall_speed,
            rise_height: self.config.ground_spawn_height,
            rise_duration: self.config.rise_duration,
            kill_floor_y: self.config.kill_floor_y,
            dt,
        };

        let mut finished = Vec::new();
        for &entity in &self.live {
            if let Ok((transform, motion)) =
                world.query_one_mut::<(&mut Transform, &mut HazardMotion)>(entity)
            {
                if motion.step(transform, &ctx, query) == MotionOutcome::Destroy {
                    finished.push(entity);
                }
            }
        }
        for entity in finished {
            self.destroy(world, entity);
        }
    }

    fn destroy(&mut self, world: &mut World, entity: Entity) {
        world.despawn(entity).ok();
        self.live.retain(|&e| e != entity);
    }

    /// Retint every live hazard; later spawns use the same tint.
    pub fn set_hazard_color(&mut self, world: &mut World, tint: Tint) {
        self.hazard_tint = tint;
        for &entity in &self.live {
            if let Ok(mut t) = world.get::<&mut Tint>(entity) {
                *t = tint;
            }
        }
        log::info!("Hazard colour set to {:?} on {} live hazards", tint.rgba(), self.live.len());
    }

    /// Report hazards touching the target. Ground hazards are consumed by
    /// the hit; sky hazards keep falling. Returns the number of touches.
    pub fn resolve_collisions<R: HitReceiver + ?Sized>(
        &mut self,
        world: &mut World,
        target: Vec3,
        receiver: &mut R,
    ) -> usize {
        let mut touches = 0;
        let mut consumed = Vec::new();
        for &entity in &self.live {
            let Ok(mut q) = world.query_one::<(&Transform, &Hazard)>(entity) else {
                continue;
            };
            let Some((transform, hazard)) = q.get() else {
                continue;
            };
            if transform.position.distance(target) > self.config.hit_radius {
                continue;
            }
            touches += 1;
            receiver.on_obstacle_hit();
            if hazard.kind == HazardKind::GroundFollow {
                consumed.push(entity);
            }
        }
        for entity in consumed {
            self.destroy(world, entity);
        }
        touches
    }

    /// Format session time as MM:SS.
    pub fn time_elapsed_str(&self) -> String {
        let mins = (self.time_elapsed / 60.0) as u32;
        let secs = (self.time_elapsed % 60.0) as u32;
        format!("{:02}:{:02}", mins, secs)
    }
}
