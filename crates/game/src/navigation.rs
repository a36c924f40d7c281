//! Ground navigation: a steering agent that walks toward a destination.
//!
//! There is no navigation mesh; agents steer straight at their destination,
//! accelerate and brake at a fixed rate, and stick to the terrain surface.

use engine_core::{move_towards, Transform, Vec3};
use physics::SceneQuery;

/// Path-following primitives used by ground NPCs.
pub trait NavAgent {
    /// Start moving toward `destination` with top speed `speed`.
    fn set_destination(&mut self, destination: Vec3, speed: f32);
    /// Integrate one tick of movement.
    fn advance<Q: SceneQuery + ?Sized>(&mut self, query: &Q, dt: f32);
    fn has_path(&self) -> bool;
    fn destination(&self) -> Option<Vec3>;
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    /// Zero velocity and speed and drop the path.
    fn full_stop(&mut self);
}

/// Steering agent that brakes to rest on its destination.
#[derive(Debug, Clone)]
pub struct GroundAgent {
    pub transform: Transform,
    velocity: Vec3,
    speed: f32,
    acceleration: f32,
    destination: Option<Vec3>,
}

impl GroundAgent {
    pub fn new(position: Vec3, acceleration: f32) -> Self {
        Self {
            transform: Transform::from_position(position),
            velocity: Vec3::ZERO,
            speed: 0.0,
            acceleration,
            destination: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Apply an outside push (collisions, scripted knockback).
    pub fn nudge(&mut self, velocity: Vec3) {
        self.velocity += velocity;
    }

    /// Teleport without touching velocity or path.
    pub fn warp(&mut self, position: Vec3) {
        self.transform.position = position;
    }
}

impl NavAgent for GroundAgent {
    fn set_destination(&mut self, destination: Vec3, speed: f32) {
        self.destination = Some(destination);
        self.speed = speed;
    }

    fn advance<Q: SceneQuery + ?Sized>(&mut self, query: &Q, dt: f32) {
        let desired = match self.destination {
            Some(destination) => {
                let offset = destination - self.transform.position;
                let flat = Vec3::new(offset.x, 0.0, offset.z);
                let distance = flat.length();
                if distance < 0.01 {
                    self.velocity = Vec3::ZERO;
                    Vec3::ZERO
                } else {
                    let braking = (2.0 * self.acceleration * distance).sqrt();
                    flat / distance * self.speed.min(braking)
                }
            }
            None => Vec3::ZERO,
        };

        self.velocity = move_towards(self.velocity, desired, self.acceleration * dt);
        self.transform.position += self.velocity * dt;

        let p = self.transform.position;
        if let Some(ground) = query.ground_height(p.x, p.z) {
            self.transform.position.y = ground;
        }
        if self.velocity.length_squared() > 1e-4 {
            self.transform.turn_towards(self.velocity, 1.0);
        }
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn full_stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.speed = 0.0;
        self.destination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::PhysicsWorld;

    fn flat() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        world.update_query_pipeline();
        world
    }

    #[test]
    fn walks_to_destination_and_rests_there() {
        let world = flat();
        let mut agent = GroundAgent::new(Vec3::ZERO, 8.0);
        agent.set_destination(Vec3::new(6.0, 0.0, 0.0), 5.0);
        assert!(agent.has_path());

        let mut top_speed: f32 = 0.0;
        for _ in 0..300 {
            agent.advance(&world, 1.0 / 60.0);
            top_speed = top_speed.max(agent.velocity().length());
        }
        assert!(agent.position().distance(Vec3::new(6.0, 0.0, 0.0)) < 0.05);
        assert!(agent.velocity().length() < 0.05);
        assert!(top_speed <= 5.0 + 1e-4);
    }

    #[test]
    fn full_stop_clears_everything() {
        let world = flat();
        let mut agent = GroundAgent::new(Vec3::ZERO, 8.0);
        agent.set_destination(Vec3::new(0.0, 0.0, -10.0), 5.0);
        for _ in 0..30 {
            agent.advance(&world, 1.0 / 60.0);
        }
        assert!(agent.velocity().length() > 0.0);
        agent.full_stop();
        assert!(!agent.has_path());
        assert_eq!(agent.velocity(), Vec3::ZERO);
        assert_eq!(agent.speed(), 0.0);
    }

    #[test]
    fn pushes_decay_without_a_path() {
        let world = flat();
        let mut agent = GroundAgent::new(Vec3::ZERO, 8.0);
        agent.nudge(Vec3::new(2.0, 0.0, 0.0));
        agent.advance(&world, 0.1);
        assert!(agent.position().x > 0.0);
        for _ in 0..10 {
            agent.advance(&world, 0.1);
        }
        assert_eq!(agent.velocity(), Vec3::ZERO);
    }
}
