//! Player controller: hit feedback and terrain-following motor.

use engine_core::{smooth_damp, smooth_damp_angle, yaw_for_direction, Tint, Transform, Vec3};
use physics::{ColliderHandle, SceneQuery};

use crate::config::PlayerConfig;
use crate::perception::Target;

/// Hits that turn the player permanently red.
pub const HITS_TO_PERMANENT_RED: u32 = 3;
/// Seconds the player shows red in one flash (followed by the same time unlit).
pub const FLASH_HALF_PERIOD: f32 = 0.2;

/// Something that can be touched by hovering agents and struck by hazards.
pub trait HitReceiver {
    /// A hover agent is in contact.
    fn on_contact(&mut self);
    /// A spawned hazard struck the receiver.
    fn on_obstacle_hit(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Contact,
    Obstacle,
}

#[derive(Debug, Clone, Copy)]
struct Flash {
    count: u32,
    elapsed: f32,
    stay_red: bool,
}

impl Flash {
    fn duration(&self) -> f32 {
        self.count as f32 * FLASH_HALF_PERIOD * 2.0
    }
}

/// Rate-limited hit counter with red flash feedback.
#[derive(Debug, Clone)]
pub struct HitFeedback {
    hit_count: u32,
    cooldown: f32,
    clock: f32,
    last_hit: Option<f32>,
    flash: Option<Flash>,
    permanent_red: bool,
    base_tint: Tint,
}

impl HitFeedback {
    pub fn new(cooldown: f32, base_tint: Tint) -> Self {
        Self {
            hit_count: 0,
            cooldown,
            clock: 0.0,
            last_hit: None,
            flash: None,
            permanent_red: false,
            base_tint,
        }
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    pub fn is_permanently_red(&self) -> bool {
        self.permanent_red
    }

    /// Count a hit unless one was counted less than `cooldown` seconds ago.
    /// Returns whether the hit counted.
    pub fn register(&mut self, source: HitSource) -> bool {
        if let Some(last) = self.last_hit {
            let since = self.clock - last;
            if since < self.cooldown {
                log::debug!("{:?} hit ignored due to cooldown ({:.2}s since last)", source, since);
                return false;
            }
        }

        self.hit_count += 1;
        self.last_hit = Some(self.clock);
        log::info!("Player hit by {:?} ({} hits)", source, self.hit_count);

        if self.hit_count < HITS_TO_PERMANENT_RED {
            self.flash = Some(Flash {
                count: 2,
                elapsed: 0.0,
                stay_red: false,
            });
        } else if self.hit_count == HITS_TO_PERMANENT_RED {
            self.flash = Some(Flash {
                count: 3,
                elapsed: 0.0,
                stay_red: true,
            });
        }
        true
    }

    /// Advance the cooldown clock and any running flash.
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        if let Some(flash) = &mut self.flash {
            flash.elapsed += dt;
            if flash.elapsed >= flash.duration() {
                if flash.stay_red {
                    self.permanent_red = true;
                    log::info!("Player turned red permanently after {} hits", self.hit_count);
                }
                self.flash = None;
            }
        }
    }

    /// Colour the player should be drawn with right now.
    pub fn tint(&self) -> Tint {
        match self.flash {
            Some(flash) => {
                if flash.elapsed % (FLASH_HALF_PERIOD * 2.0) < FLASH_HALF_PERIOD {
                    Tint::RED
                } else {
                    self.base_tint
                }
            }
            None if self.permanent_red => Tint::RED,
            None => self.base_tint,
        }
    }
}

impl HitReceiver for HitFeedback {
    fn on_contact(&mut self) {
        self.register(HitSource::Contact);
    }

    fn on_obstacle_hit(&mut self) {
        self.register(HitSource::Obstacle);
    }
}

/// Movement request for one tick. Input polling itself lives outside the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// World-space horizontal direction; magnitudes below 0.1 mean no movement.
    pub move_dir: Vec3,
    pub jump: bool,
}

/// Vertical state for the terrain-following motor.
#[derive(Debug, Clone, Default)]
pub struct PlayerMotor {
    vertical_velocity: f32,
    height_velocity: f32,
    turn_velocity: f32,
}

/// Player transform, capsule collider, motor and hit feedback.
pub struct Player {
    pub transform: Transform,
    pub collider: ColliderHandle,
    pub hits: HitFeedback,
    pub tint: Tint,
    motor: PlayerMotor,
    config: PlayerConfig,
}

impl Player {
    pub fn new(position: Vec3, collider: ColliderHandle, config: PlayerConfig) -> Self {
        Self {
            transform: Transform::from_position(position),
            collider,
            hits: HitFeedback::new(config.hit_cooldown, Tint::WHITE),
            tint: Tint::WHITE,
            motor: PlayerMotor::default(),
            config,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.motor.vertical_velocity
    }

    /// The player as seen by NPCs.
    pub fn as_target(&self) -> Target {
        Target {
            position: self.transform.position,
            collider: self.collider,
        }
    }

    /// Height the capsule centre rests at above `ground`.
    fn rest_height(&self, ground: f32) -> f32 {
        ground + self.config.height_offset + self.config.capsule_height / 2.0
    }

    /// Place the player on the terrain under its current position.
    pub fn snap_to_ground<Q: SceneQuery + ?Sized>(&mut self, query: &Q) {
        let p = self.transform.position;
        if let Some(ground) = query.ground_height(p.x, p.z) {
            self.transform.position.y = self.rest_height(ground);
            self.motor.vertical_velocity = 0.0;
        }
    }

    /// Resting on the terrain and not moving upward.
    pub fn is_grounded<Q: SceneQuery + ?Sized>(&self, query: &Q) -> bool {
        let p = self.transform.position;
        match query.ground_height(p.x, p.z) {
            Some(ground) => {
                (p.y - self.rest_height(ground)).abs() < 0.2 && self.motor.vertical_velocity <= 0.0
            }
            None => false,
        }
    }

    /// Apply one tick of movement input, gravity and terrain following.
    pub fn update_motor<Q: SceneQuery + ?Sized>(&mut self, query: &Q, input: &PlayerInput, dt: f32) {
        let mut horizontal = Vec3::ZERO;
        let flat = Vec3::new(input.move_dir.x, 0.0, input.move_dir.z);
        if flat.length() >= 0.1 {
            let dir = flat.normalize();
            if let Some(target_yaw) = yaw_for_direction(dir) {
                let yaw = smooth_damp_angle(
                    self.transform.yaw(),
                    target_yaw,
                    &mut self.motor.turn_velocity,
                    self.config.turn_smooth_time,
                    dt,
                );
                self.transform.set_yaw(yaw);
            }
            horizontal = dir * self.config.speed * dt;
        }

        if input.jump && self.is_grounded(query) {
            self.motor.vertical_velocity = self.config.jump_force;
        }

        let start = self.transform.position;
        match query.ground_height(start.x, start.z) {
            Some(ground) => {
                let target_height = self.rest_height(ground);
                self.motor.vertical_velocity -= self.config.gravity * dt;
                self.transform.position += horizontal;
                self.transform.position.y += self.motor.vertical_velocity * dt;

                if self.is_grounded(query) {
                    self.transform.position.y = smooth_damp(
                        start.y,
                        target_height,
                        &mut self.motor.height_velocity,
                        self.config.height_smooth_time,
                        dt,
                    );
                    self.motor.vertical_velocity = 0.0;
                } else if self.transform.position.y < target_height {
                    self.transform.position.y = target_height;
                    self.motor.vertical_velocity = 0.0;
                }
            }
            None => {
                self.motor.vertical_velocity -= self.config.gravity * dt;
                self.transform.position += horizontal;
                self.transform.position.y += self.motor.vertical_velocity * dt;
            }
        }
    }

    /// Advance hit feedback timers and refresh the visible tint.
    pub fn update_visuals(&mut self, dt: f32) {
        self.hits.update(dt);
        self.tint = self.hits.tint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::PhysicsWorld;

    #[test]
    fn hits_inside_cooldown_collapse() {
        let mut hits = HitFeedback::new(3.0, Tint::WHITE);
        hits.on_contact();
        hits.update(1.0);
        hits.on_contact();
        hits.update(1.0);
        hits.on_obstacle_hit();
        assert_eq!(hits.hit_count(), 1);

        hits.update(1.0);
        hits.on_contact();
        assert_eq!(hits.hit_count(), 2);
    }

    #[test]
    fn first_hits_flash_twice_then_restore() {
        let mut hits = HitFeedback::new(3.0, Tint::WHITE);
        assert!(hits.register(HitSource::Contact));
        assert_eq!(hits.tint(), Tint::RED);
        hits.update(0.25);
        assert_eq!(hits.tint(), Tint::WHITE);
        hits.update(0.2);
        assert_eq!(hits.tint(), Tint::RED);
        hits.update(0.4);
        assert!(!hits.is_flashing());
        assert_eq!(hits.tint(), Tint::WHITE);
    }

    #[test]
    fn third_counted_hit_turns_red_for_good() {
        let mut hits = HitFeedback::new(3.0, Tint::WHITE);
        for _ in 0..3 {
            assert!(hits.register(HitSource::Obstacle));
            hits.update(3.0);
        }
        assert_eq!(hits.hit_count(), 3);
        assert!(hits.is_permanently_red());
        assert_eq!(hits.tint(), Tint::RED);

        assert!(hits.register(HitSource::Contact));
        assert_eq!(hits.hit_count(), 4);
        assert!(!hits.is_flashing());
        assert_eq!(hits.tint(), Tint::RED);
    }

    #[test]
    fn third_hit_cancels_running_flash() {
        let mut hits = HitFeedback::new(0.1, Tint::WHITE);
        hits.register(HitSource::Contact);
        hits.update(0.2);
        hits.register(HitSource::Contact);
        hits.update(0.5);
        hits.register(HitSource::Contact);
        // Three flashes of 0.4s each.
        hits.update(1.0);
        assert!(hits.is_flashing());
        hits.update(0.25);
        assert!(hits.is_permanently_red());
    }

    fn flat_world() -> (PhysicsWorld, Player) {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let collider = world.add_player_capsule(Vec3::new(0.0, 5.0, 0.0), 0.5, 0.5);
        world.update_query_pipeline();
        let player = Player::new(Vec3::new(0.0, 5.0, 0.0), collider, PlayerConfig::default());
        (world, player)
    }

    #[test]
    fn motor_settles_on_rest_height() {
        let (world, mut player) = flat_world();
        player.snap_to_ground(&world);
        assert!((player.position().y - 1.5).abs() < 1e-5);

        let input = PlayerInput {
            move_dir: Vec3::X,
            jump: false,
        };
        for _ in 0..60 {
            player.update_motor(&world, &input, 1.0 / 60.0);
        }
        assert!((player.position().x - 6.0).abs() < 1e-3);
        assert!((player.position().y - 1.5).abs() < 0.05);
        assert!(player.is_grounded(&world));
        assert!(player.transform.forward().x > 0.9);
    }

    #[test]
    fn jump_rises_then_lands() {
        let (world, mut player) = flat_world();
        player.snap_to_ground(&world);
        let jump = PlayerInput {
            move_dir: Vec3::ZERO,
            jump: true,
        };
        player.update_motor(&world, &jump, 1.0 / 60.0);
        assert!(player.vertical_velocity() > 0.0);
        assert!(player.position().y > 1.5);

        let idle = PlayerInput::default();
        for _ in 0..120 {
            player.update_motor(&world, &idle, 1.0 / 60.0);
        }
        assert!((player.position().y - 1.5).abs() < 0.05);
    }

    #[test]
    fn no_ground_means_free_fall() {
        let world = PhysicsWorld::new();
        let mut player = Player::new(Vec3::new(0.0, 5.0, 0.0), ColliderHandle::invalid(), PlayerConfig::default());
        for _ in 0..30 {
            player.update_motor(&world, &PlayerInput::default(), 1.0 / 60.0);
        }
        assert!(player.position().y < 5.0);
        assert!(player.vertical_velocity() < 0.0);
    }
}
