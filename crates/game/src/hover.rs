//! Hovering patrol NPC: waypoint patrol, view sweeps, chase and search.
//!
//! Each tick the agent first re-snaps to the terrain, then perceives the
//! target (any state jumps to [`HoverState::Chase`] on sight or contact),
//! then runs the behaviour of its current state. Movement probes ahead for
//! walls and sidesteps right, then left; with all three blocked the agent
//! turns around in place.

use std::f32::consts::PI;

use engine_core::{lerp, Tint, Transform, Vec3};
use physics::{CollisionGroup, SceneQuery, GROUND_PROBE_LENGTH};

use crate::config::HoverConfig;
use crate::error::{non_negative, positive, ConfigError};
use crate::patrol::{PatrolRoute, Waypoint};
use crate::perception::{is_in_contact, Perception, Target};
use crate::player::HitReceiver;

/// Horizontal distance at which a waypoint counts as reached.
pub const ARRIVAL_DISTANCE: f32 = 0.5;

/// Yaw offsets (degrees) visited by a stationary agent that lost its target.
pub const STATIONARY_PATTERN: [f32; 9] = [0.0, 45.0, 90.0, 45.0, 0.0, -45.0, -90.0, -45.0, 0.0];

/// Behaviour of a hover agent. Timers live in the variant that uses them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverState {
    Patrol,
    WaitAtPoint { elapsed: f32 },
    SearchAtPoint { elapsed: f32, initial_yaw: f32 },
    Chase,
    LostSearch { elapsed: f32, initial_yaw: f32 },
    StationarySearch { elapsed: f32, initial_yaw: f32 },
    /// `resume_chase` is set when the turn interrupted a chase.
    WallPivot { elapsed: f32, start_yaw: f32, resume_chase: bool },
}

impl HoverState {
    pub fn name(&self) -> &'static str {
        match self {
            HoverState::Patrol => "Patrol",
            HoverState::WaitAtPoint { .. } => "WaitAtPoint",
            HoverState::SearchAtPoint { .. } => "SearchAtPoint",
            HoverState::Chase => "Chase",
            HoverState::LostSearch { .. } => "LostSearch",
            HoverState::StationarySearch { .. } => "StationarySearch",
            HoverState::WallPivot { .. } => "WallPivot",
        }
    }
}

/// Yaw offset in degrees `elapsed` seconds into a stationary search.
/// Each pattern step pivots from the previous angle for `pivot` seconds,
/// then holds for `pause` seconds.
pub fn stationary_search_angle(elapsed: f32, pivot: f32, pause: f32) -> f32 {
    let step_duration = pivot + pause;
    let step = (elapsed / step_duration).floor() as usize;
    let time_in_step = elapsed % step_duration;
    let len = STATIONARY_PATTERN.len();
    let index = step % len;
    let target = STATIONARY_PATTERN[index];
    let previous = STATIONARY_PATTERN[(index + len - 1) % len];

    if time_in_step < pivot {
        lerp(previous, target, time_in_step / pivot)
    } else {
        target
    }
}

/// Yaw offset in degrees at `progress` (0..=1) through a lost-target sweep:
/// 0 to 180, back to 0, then to -180, in equal thirds.
pub fn lost_search_angle(progress: f32) -> f32 {
    let third = 1.0 / 3.0;
    let p = progress.clamp(0.0, 1.0);
    if p < third {
        lerp(0.0, 180.0, p / third)
    } else if p < 2.0 * third {
        lerp(180.0, 0.0, (p - third) / third)
    } else {
        lerp(0.0, -180.0, ((p - 2.0 * third) / third).min(1.0))
    }
}

/// Yaw offset in degrees at `progress` through a waypoint sweep:
/// out to `range` over the first half, back to 0 over the second.
pub fn point_search_angle(progress: f32, range: f32, pivot_left: bool) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    let magnitude = if p < 0.5 {
        lerp(0.0, range, p / 0.5)
    } else {
        lerp(range, 0.0, (p - 0.5) / 0.5)
    };
    if pivot_left {
        magnitude
    } else {
        -magnitude
    }
}

/// A hovering NPC that patrols a route (or stands guard) and chases the target on sight.
pub struct HoverNpc {
    pub name: String,
    pub transform: Transform,
    /// Indicator light colour.
    pub tint: Tint,
    state: HoverState,
    route: PatrolRoute,
    stationary: bool,
    perception: Perception,
    config: HoverConfig,
    default_tint: Tint,
    alert_tint: Tint,
}

impl HoverNpc {
    pub fn new(
        name: impl Into<String>,
        config: &HoverConfig,
        position: Vec3,
        yaw: f32,
        waypoints: Vec<Waypoint>,
        stationary: bool,
    ) -> Result<Self, ConfigError> {
        non_negative("speed", config.speed)?;
        non_negative("chase_speed_multiplier", config.chase_speed_multiplier)?;
        non_negative("contact_distance", config.contact_distance)?;
        non_negative("delay_at_point", config.delay_at_point)?;
        non_negative("stationary_pause_duration", config.stationary_pause_duration)?;
        positive("search_duration", config.search_duration)?;
        positive("lost_search_duration", config.lost_search_duration)?;
        positive("stationary_pivot_duration", config.stationary_pivot_duration)?;
        positive("wall_pivot_duration", config.wall_pivot_duration)?;
        let perception = Perception::new(config.search_fov, config.detection_distance)?;

        let name = name.into();
        if !stationary && waypoints.is_empty() {
            log::warn!("{} has no patrol waypoints and will idle until it sees the target", name);
        }

        Ok(Self {
            name,
            transform: Transform::from_position_yaw(position, yaw),
            tint: config.default_tint.into(),
            state: HoverState::Patrol,
            route: PatrolRoute::new(waypoints),
            stationary,
            perception,
            config: config.clone(),
            default_tint: config.default_tint.into(),
            alert_tint: config.alert_tint.into(),
        })
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Eye position used for sight checks.
    pub fn eye(&self) -> Vec3 {
        self.transform.position + Vec3::Y * self.config.eye_height
    }

    fn set_state(&mut self, state: HoverState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&state) {
            log::debug!("{}: {} -> {}", self.name, self.state.name(), state.name());
        }
        self.state = state;
    }

    fn can_see<Q: SceneQuery + ?Sized>(&self, query: &Q, target: &Target) -> bool {
        self.perception
            .can_see(query, self.eye(), self.transform.forward(), target)
    }

    fn in_contact(&self, target: &Target) -> bool {
        is_in_contact(self.transform.position, target.position, self.config.contact_distance)
    }

    /// Keep the agent `hover_height` above the terrain below it.
    pub fn maintain_hover_height<Q: SceneQuery + ?Sized>(&mut self, query: &Q) {
        let origin = self.transform.position + Vec3::Y * 0.5;
        if let Some(hit) = query.raycast(
            origin,
            -Vec3::Y,
            GROUND_PROBE_LENGTH,
            CollisionGroup::Ground.mask(),
        ) {
            self.transform.position.y = hit.point.y + self.config.hover_height;
        }
    }

    /// Advance one tick.
    pub fn update<Q, R>(&mut self, query: &Q, target: &Target, receiver: &mut R, dt: f32)
    where
        Q: SceneQuery + ?Sized,
        R: HitReceiver + ?Sized,
    {
        self.transform.flatten_to_yaw();
        self.maintain_hover_height(query);

        let visible = self.can_see(query, target);
        let contact = self.in_contact(target);
        if visible || contact {
            if self.state != HoverState::Chase {
                log::info!("{} spotted the target", self.name);
            }
            self.set_state(HoverState::Chase);
            self.tint = self.alert_tint;
            if contact {
                receiver.on_contact();
            }
        }

        match self.state {
            HoverState::Patrol => self.patrol(query, target, dt),
            HoverState::WaitAtPoint { elapsed } => self.wait_at_point(elapsed + dt),
            HoverState::SearchAtPoint {
                elapsed,
                initial_yaw,
            } => self.search_at_point(elapsed + dt, initial_yaw),
            HoverState::Chase => self.chase(query, target, contact, dt),
            HoverState::LostSearch {
                elapsed,
                initial_yaw,
            } => self.lost_search(query, target, elapsed + dt, initial_yaw),
            HoverState::StationarySearch {
                elapsed,
                initial_yaw,
            } => self.stationary_search(query, target, elapsed + dt, initial_yaw, dt),
            HoverState::WallPivot {
                elapsed,
                start_yaw,
                resume_chase,
            } => self.wall_pivot(query, target, elapsed + dt, start_yaw, resume_chase),
        }
    }

    fn patrol<Q: SceneQuery + ?Sized>(&mut self, query: &Q, target: &Target, dt: f32) {
        if self.stationary {
            return;
        }
        let Some(waypoint) = self.route.current().copied() else {
            return;
        };

        let offset = waypoint.position - self.transform.position;
        let flat = Vec3::new(offset.x, 0.0, offset.z);
        let distance = flat.length();

        self.move_in_direction(query, target, flat.normalize_or_zero(), self.config.speed, dt);
        if matches!(self.state, HoverState::WallPivot { .. }) {
            return;
        }

        if distance < ARRIVAL_DISTANCE {
            if waypoint.is_search_point {
                log::debug!("{} reached search point {}", self.name, self.route.index());
                self.set_state(HoverState::SearchAtPoint {
                    elapsed: 0.0,
                    initial_yaw: self.transform.yaw(),
                });
            } else {
                log::debug!("{} reached patrol point {}", self.name, self.route.index());
                self.set_state(HoverState::WaitAtPoint { elapsed: 0.0 });
            }
        }
    }

    fn wait_at_point(&mut self, elapsed: f32) {
        if elapsed >= self.config.delay_at_point {
            self.route.advance();
            self.set_state(HoverState::Patrol);
        } else {
            self.state = HoverState::WaitAtPoint { elapsed };
        }
    }

    fn search_at_point(&mut self, elapsed: f32, initial_yaw: f32) {
        let progress = elapsed / self.config.search_duration;
        let (range, pivot_left) = self
            .route
            .current()
            .map(|w| (w.pivot_range, w.pivot_left))
            .unwrap_or((0.0, true));

        let angle = point_search_angle(progress, range, pivot_left);
        self.transform.set_yaw(initial_yaw + angle.to_radians());

        if progress >= 1.0 {
            self.transform.set_yaw(initial_yaw);
            self.route.advance();
            self.set_state(HoverState::Patrol);
        } else {
            self.state = HoverState::SearchAtPoint {
                elapsed,
                initial_yaw,
            };
        }
    }

    fn chase<Q: SceneQuery + ?Sized>(&mut self, query: &Q, target: &Target, contact: bool, dt: f32) {
        let offset = target.position - self.transform.position;
        let direction = offset.normalize_or_zero();
        self.transform
            .turn_towards(direction, dt * self.config.speed * 2.0);

        if contact {
            return;
        }

        if !self.can_see(query, target) {
            self.lose_target();
            return;
        }

        if offset.length() > self.config.contact_distance {
            let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
            let chase_speed = self.config.speed * self.config.chase_speed_multiplier;
            self.move_in_direction(query, target, flat, chase_speed, dt);
        }
    }

    /// Leave a chase for the search that fits this agent.
    fn lose_target(&mut self) {
        let initial_yaw = self.transform.yaw();
        if self.stationary {
            log::info!("{} lost the target, sweeping in place", self.name);
            self.set_state(HoverState::StationarySearch {
                elapsed: 0.0,
                initial_yaw,
            });
        } else {
            log::info!("{} lost the target, searching", self.name);
            self.set_state(HoverState::LostSearch {
                elapsed: 0.0,
                initial_yaw,
            });
        }
    }

    fn lost_search<Q: SceneQuery + ?Sized>(
        &mut self,
        query: &Q,
        target: &Target,
        elapsed: f32,
        initial_yaw: f32,
    ) {
        let progress = elapsed / self.config.lost_search_duration;
        self.transform
            .set_yaw(initial_yaw + lost_search_angle(progress).to_radians());

        if self.can_see(query, target) {
            self.tint = self.alert_tint;
            self.set_state(HoverState::Chase);
            return;
        }

        if progress >= 1.0 {
            self.tint = self.default_tint;
            self.transform.set_yaw(initial_yaw);
            log::info!("{} gave up the search, resuming patrol", self.name);
            self.set_state(HoverState::Patrol);
        } else {
            self.state = HoverState::LostSearch {
                elapsed,
                initial_yaw,
            };
        }
    }

    fn stationary_search<Q: SceneQuery + ?Sized>(
        &mut self,
        query: &Q,
        target: &Target,
        elapsed: f32,
        initial_yaw: f32,
        dt: f32,
    ) {
        let pivot = self.config.stationary_pivot_duration;
        let pause = self.config.stationary_pause_duration;
        let angle = stationary_search_angle(elapsed, pivot, pause);
        self.transform.set_yaw(initial_yaw + angle.to_radians());
        self.state = HoverState::StationarySearch {
            elapsed,
            initial_yaw,
        };

        let step_duration = pivot + pause;
        let time_in_step = elapsed % step_duration;
        if time_in_step >= step_duration - dt && self.can_see(query, target) {
            self.tint = self.alert_tint;
            self.set_state(HoverState::Chase);
        }
    }

    fn wall_pivot<Q: SceneQuery + ?Sized>(
        &mut self,
        query: &Q,
        target: &Target,
        elapsed: f32,
        start_yaw: f32,
        resume_chase: bool,
    ) {
        let progress = (elapsed / self.config.wall_pivot_duration).min(1.0);
        if progress < 1.0 {
            self.transform.set_yaw(start_yaw + PI * progress);
            self.state = HoverState::WallPivot {
                elapsed,
                start_yaw,
                resume_chase,
            };
            return;
        }

        self.transform.set_yaw(start_yaw + PI);
        log::debug!("{} finished turning away from the wall", self.name);
        if !resume_chase {
            self.set_state(HoverState::Patrol);
        } else if self.can_see(query, target) {
            self.set_state(HoverState::Chase);
        } else {
            self.lose_target();
        }
    }

    /// True unless a short probe along `direction` hits a non-ground, non-trigger collider.
    fn is_path_clear<Q: SceneQuery + ?Sized>(&self, query: &Q, direction: Vec3, distance: f32) -> bool {
        match query.raycast(
            self.transform.position,
            direction,
            distance,
            CollisionGroup::all(),
        ) {
            Some(hit) => hit.is_ground() || hit.is_trigger,
            None => true,
        }
    }

    fn move_in_direction<Q: SceneQuery + ?Sized>(
        &mut self,
        query: &Q,
        target: &Target,
        direction: Vec3,
        move_speed: f32,
        dt: f32,
    ) {
        if self.state == HoverState::Chase
            && self.transform.position.distance(target.position) <= self.config.contact_distance
        {
            return;
        }
        if direction == Vec3::ZERO {
            return;
        }

        let check_distance = move_speed * dt * 2.0;
        let mut direction = direction;
        if !self.is_path_clear(query, direction, check_distance) {
            let right = direction.cross(Vec3::Y).normalize_or_zero();
            let left = -right;
            if self.is_path_clear(query, right, check_distance) {
                direction = right;
            } else if self.is_path_clear(query, left, check_distance) {
                direction = left;
            } else {
                log::debug!("{} is boxed in, turning around", self.name);
                self.set_state(HoverState::WallPivot {
                    elapsed: 0.0,
                    start_yaw: self.transform.yaw(),
                    resume_chase: self.state == HoverState::Chase,
                });
                return;
            }
        }

        let step = direction * move_speed * dt;
        self.transform.position += step;
        if step != Vec3::ZERO {
            self.transform.turn_towards(direction, dt * self.config.speed);
        }
    }
}
