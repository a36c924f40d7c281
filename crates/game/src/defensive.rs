//! Defensive NPC: keeps away from the target by running between safe spots.
//!
//! The agent polls the target distance on a deadline (short interval while
//! fleeing or hiding, long otherwise), walks with a [`GroundAgent`], and
//! corrects any drift once it has come to rest.

use engine_core::Vec3;
use physics::SceneQuery;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::DefensiveConfig;
use crate::error::{non_negative, positive, ConfigError};
use crate::navigation::{GroundAgent, NavAgent};

/// Number of safe-location slots an agent can be given.
pub const MAX_SAFE_SLOTS: usize = 7;

/// How far from a configured point walkable ground must be.
const WALKABLE_SAMPLE_RADIUS: f32 = 1.0;

/// Grace period after arriving before residual velocity counts as drift.
const SETTLE_TIME: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefensiveState {
    AtOriginal,
    MovingToSafe,
    AtSafe,
    MovingToOriginal,
}

impl DefensiveState {
    pub fn is_moving(self) -> bool {
        matches!(self, DefensiveState::MovingToSafe | DefensiveState::MovingToOriginal)
    }

    /// Fleeing or hiding; polls use the short interval.
    pub fn is_seeking_safety(self) -> bool {
        matches!(self, DefensiveState::MovingToSafe | DefensiveState::AtSafe)
    }
}

pub struct DefensiveNpc {
    pub name: String,
    agent: GroundAgent,
    state: DefensiveState,
    origin: Vec3,
    safe_locations: Vec<Vec3>,
    config: DefensiveConfig,
    rng: StdRng,
    clock: f32,
    next_check: f32,
    last_arrival: f32,
    last_position: Vec3,
}

impl DefensiveNpc {
    /// Build an agent standing at `origin`. Empty slots are skipped.
    pub fn new<Q: SceneQuery + ?Sized>(
        name: impl Into<String>,
        config: &DefensiveConfig,
        origin: Vec3,
        safe_slots: &[Option<Vec3>],
        query: &Q,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if safe_slots.len() > MAX_SAFE_SLOTS {
            return Err(ConfigError::TooManySafeSlots {
                max: MAX_SAFE_SLOTS,
                got: safe_slots.len(),
            });
        }
        positive("check_interval", config.check_interval)?;
        positive("safe_check_interval", config.safe_check_interval)?;
        positive("acceleration", config.acceleration)?;
        non_negative("detection_radius", config.detection_radius)?;
        non_negative("min_distance_threshold", config.min_distance_threshold)?;
        non_negative("flee_speed", config.flee_speed)?;
        non_negative("return_speed", config.return_speed)?;
        non_negative("arrival_distance", config.arrival_distance)?;

        let name = name.into();
        let safe_locations: Vec<Vec3> = safe_slots.iter().flatten().copied().collect();
        if safe_locations.is_empty() {
            log::warn!("{} has no safe locations assigned and will never flee", name);
        }
        for (i, location) in safe_locations.iter().enumerate() {
            if query
                .sample_nearest_walkable(*location, WALKABLE_SAMPLE_RADIUS)
                .is_none()
            {
                log::warn!("{}: safe location {} at {:?} is not on walkable ground", name, i, location);
            }
        }
        if query
            .sample_nearest_walkable(origin, WALKABLE_SAMPLE_RADIUS)
            .is_none()
        {
            log::warn!("{}: original position {:?} is not on walkable ground", name, origin);
        }

        Ok(Self {
            name,
            agent: GroundAgent::new(origin, config.acceleration),
            state: DefensiveState::AtOriginal,
            origin,
            safe_locations,
            config: config.clone(),
            rng,
            clock: 0.0,
            next_check: 0.0,
            last_arrival: 0.0,
            last_position: origin,
        })
    }

    pub fn state(&self) -> DefensiveState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.agent.position()
    }

    pub fn agent(&self) -> &GroundAgent {
        &self.agent
    }

    pub fn safe_locations(&self) -> &[Vec3] {
        &self.safe_locations
    }

    /// Advance one tick against a target at `target`.
    pub fn update<Q: SceneQuery + ?Sized>(&mut self, query: &Q, target: Vec3, dt: f32) {
        self.clock += dt;

        if self.clock >= self.next_check {
            self.check_proximity(target);
            let interval = if self.state.is_seeking_safety() {
                self.config.safe_check_interval
            } else {
                self.config.check_interval
            };
            self.next_check = self.clock + interval;
        }

        self.agent.advance(query, dt);

        if self.state.is_moving() {
            self.check_arrival();
        } else {
            self.prevent_drift();
        }
        self.last_position = self.agent.position();
    }

    fn check_proximity(&mut self, target: Vec3) {
        let distance = self.agent.position().distance(target);
        match self.state {
            DefensiveState::MovingToSafe => {}
            DefensiveState::AtSafe => {
                if distance <= self.config.min_distance_threshold {
                    self.flee();
                } else if distance > self.config.detection_radius {
                    self.return_to_origin();
                }
            }
            DefensiveState::AtOriginal | DefensiveState::MovingToOriginal => {
                if distance <= self.config.detection_radius {
                    self.flee();
                }
            }
        }
    }

    fn flee(&mut self) {
        if self.safe_locations.is_empty() {
            return;
        }
        let index = self.rng.gen_range(0..self.safe_locations.len());
        let destination = self.safe_locations[index];
        log::info!("{} is fleeing to safe location {}", self.name, index);
        self.agent.set_destination(destination, self.config.flee_speed);
        self.state = DefensiveState::MovingToSafe;
    }

    fn return_to_origin(&mut self) {
        log::info!("{} is returning to its original position", self.name);
        self.agent
            .set_destination(self.origin, self.config.return_speed);
        self.state = DefensiveState::MovingToOriginal;
    }

    fn check_arrival(&mut self) {
        let Some(destination) = self.agent.destination() else {
            return;
        };
        let offset = destination - self.agent.position();
        let distance = Vec3::new(offset.x, 0.0, offset.z).length();
        if distance > self.config.arrival_distance {
            return;
        }

        self.agent.full_stop();
        self.last_arrival = self.clock;
        self.state = match self.state {
            DefensiveState::MovingToSafe => DefensiveState::AtSafe,
            _ => DefensiveState::AtOriginal,
        };
        log::debug!("{} arrived ({:?})", self.name, self.state);
    }

    fn prevent_drift(&mut self) {
        let speed = self.agent.velocity().length();
        if speed > self.config.velocity_threshold && self.clock - self.last_arrival > SETTLE_TIME {
            log::warn!("{} drifting at {:.2} u/s while idle, stopping", self.name, speed);
            self.agent.full_stop();
        }

        let moved = self.agent.position().distance(self.last_position);
        if moved > self.config.position_change_threshold {
            log::warn!("{} moved {:.2} units in one tick while idle", self.name, moved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::PhysicsWorld;
    use rand::SeedableRng;

    const DT: f32 = 0.25;

    fn flat() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        world.update_query_pipeline();
        world
    }

    fn npc(world: &PhysicsWorld, slots: &[Option<Vec3>]) -> DefensiveNpc {
        DefensiveNpc::new(
            "critter",
            &DefensiveConfig::default(),
            Vec3::ZERO,
            slots,
            world,
            StdRng::seed_from_u64(3),
        )
        .unwrap()
    }

    fn run_until<F: Fn(&DefensiveNpc) -> bool>(
        npc: &mut DefensiveNpc,
        world: &PhysicsWorld,
        target: Vec3,
        done: F,
    ) {
        for _ in 0..2000 {
            npc.update(world, target, 1.0 / 60.0);
            if done(npc) {
                return;
            }
        }
        panic!("condition never reached, state {:?}", npc.state());
    }

    #[test]
    fn first_tick_polls_and_flees() {
        let world = flat();
        let mut npc = npc(&world, &[None, Some(Vec3::new(0.0, 0.0, 30.0))]);
        assert_eq!(npc.safe_locations().len(), 1);
        npc.update(&world, Vec3::new(0.0, 0.0, -10.0), DT);
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);
    }

    #[test]
    fn polls_wait_for_the_check_interval() {
        let world = flat();
        let mut npc = npc(&world, &[Some(Vec3::new(0.0, 0.0, 30.0))]);
        let far = Vec3::new(0.0, 0.0, -200.0);
        let near = Vec3::new(0.0, 0.0, -10.0);

        npc.update(&world, far, DT);
        assert_eq!(npc.state(), DefensiveState::AtOriginal);
        // Next poll is due at 0.25 + 5.0.
        for _ in 0..19 {
            npc.update(&world, near, DT);
        }
        assert_eq!(npc.state(), DefensiveState::AtOriginal);
        npc.update(&world, near, DT);
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);
    }

    #[test]
    fn arrival_stops_the_agent() {
        let world = flat();
        let safe = Vec3::new(0.0, 0.0, 8.0);
        let mut npc = npc(&world, &[Some(safe)]);
        run_until(&mut npc, &world, Vec3::new(0.0, 0.0, -10.0), |n| {
            n.state() == DefensiveState::AtSafe
        });
        assert!(!npc.agent().has_path());
        assert_eq!(npc.agent().velocity(), Vec3::ZERO);
        assert_eq!(npc.agent().speed(), 0.0);
        assert!(npc.position().distance(safe) <= 0.5);
    }

    #[test]
    fn return_trip_stops_at_the_origin() {
        let world = flat();
        let safe = Vec3::new(0.0, 0.0, 30.0);
        let mut npc = npc(&world, &[Some(safe)]);
        npc.agent.warp(safe);
        npc.state = DefensiveState::AtSafe;

        let far = Vec3::new(0.0, 0.0, -500.0);
        npc.update(&world, far, 1.0 / 60.0);
        assert_eq!(npc.state(), DefensiveState::MovingToOriginal);
        run_until(&mut npc, &world, far, |n| n.state() == DefensiveState::AtOriginal);
        assert!(!npc.agent().has_path());
        assert_eq!(npc.agent().velocity(), Vec3::ZERO);
        assert_eq!(npc.agent().speed(), 0.0);
        assert!(npc.position().distance(Vec3::ZERO) <= 0.5);
    }

    #[test]
    fn returning_agent_flees_again() {
        let world = flat();
        let safe = Vec3::new(0.0, 0.0, 30.0);
        let mut npc = npc(&world, &[Some(safe)]);
        npc.agent.warp(safe);
        npc.state = DefensiveState::AtSafe;
        npc.check_proximity(Vec3::new(0.0, 0.0, -500.0));
        assert_eq!(npc.state(), DefensiveState::MovingToOriginal);

        // Still at the safe spot: exactly `detection_radius` away.
        npc.check_proximity(Vec3::new(0.0, 0.0, -20.0));
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);
        assert_eq!(npc.agent().destination(), Some(safe));
    }

    #[test]
    fn safe_spot_boundaries_are_exact() {
        let world = flat();
        let safe = Vec3::new(0.0, 0.0, 30.0);
        let mut npc = npc(&world, &[Some(safe)]);
        npc.agent.warp(safe);
        npc.state = DefensiveState::AtSafe;

        // Exactly at the flee threshold.
        npc.check_proximity(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);

        npc.agent.full_stop();
        npc.state = DefensiveState::AtSafe;
        // Exactly at the detection radius: stay hidden.
        npc.check_proximity(Vec3::new(0.0, 0.0, -20.0));
        assert_eq!(npc.state(), DefensiveState::AtSafe);

        npc.check_proximity(Vec3::new(0.0, 0.0, -20.5));
        assert_eq!(npc.state(), DefensiveState::MovingToOriginal);
        assert_eq!(npc.agent().destination(), Some(Vec3::ZERO));
    }

    #[test]
    fn detection_radius_is_inclusive_from_origin() {
        let world = flat();
        let mut npc = npc(&world, &[Some(Vec3::new(0.0, 0.0, 30.0))]);
        npc.check_proximity(Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);
    }

    #[test]
    fn flee_is_never_interrupted() {
        let world = flat();
        let mut npc = npc(&world, &[Some(Vec3::new(0.0, 0.0, 30.0))]);
        npc.check_proximity(Vec3::new(0.0, 0.0, -10.0));
        npc.check_proximity(Vec3::new(0.0, 0.0, -500.0));
        assert_eq!(npc.state(), DefensiveState::MovingToSafe);
    }

    #[test]
    fn without_safe_spots_it_stays_put() {
        let world = flat();
        let mut npc = npc(&world, &[None, None]);
        for _ in 0..10 {
            npc.update(&world, Vec3::new(1.0, 0.0, 0.0), DT);
        }
        assert_eq!(npc.state(), DefensiveState::AtOriginal);
        assert_eq!(npc.position(), Vec3::ZERO);
    }

    #[test]
    fn idle_drift_is_stopped() {
        let world = flat();
        let mut npc = npc(&world, &[]);
        let far = Vec3::new(0.0, 0.0, -200.0);
        for _ in 0..10 {
            npc.update(&world, far, 1.0 / 60.0);
        }
        npc.agent.nudge(Vec3::new(3.0, 0.0, 0.0));
        npc.update(&world, far, 1.0 / 60.0);
        assert_eq!(npc.agent().velocity(), Vec3::ZERO);
    }

    #[test]
    fn picks_every_safe_spot_eventually() {
        let world = flat();
        let slots = [
            Some(Vec3::new(10.0, 0.0, 0.0)),
            Some(Vec3::new(-10.0, 0.0, 0.0)),
            Some(Vec3::new(0.0, 0.0, 10.0)),
        ];
        let mut npc = npc(&world, &slots);
        let mut seen = [false; 3];
        for _ in 0..200 {
            npc.state = DefensiveState::AtOriginal;
            npc.check_proximity(Vec3::ZERO);
            let destination = npc.agent().destination().unwrap();
            let index = slots.iter().position(|s| *s == Some(destination)).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn too_many_slots_is_an_error() {
        let world = flat();
        let slots = [Some(Vec3::ZERO); 8];
        let err = DefensiveNpc::new(
            "crowded",
            &DefensiveConfig::default(),
            Vec3::ZERO,
            &slots,
            &world,
            StdRng::seed_from_u64(0),
        )
        .err();
        assert_eq!(err, Some(ConfigError::TooManySafeSlots { max: 7, got: 8 }));
    }
}
