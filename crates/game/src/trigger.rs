//! Axis-aligned trigger volumes and the colour zones built on them.

use engine_core::{Tint, Vec3};
use hecs::World;
use physics::{ColliderHandle, PhysicsWorld};

use crate::spawner::HazardSpawner;

/// Occupancy change reported by [`TriggerVolume::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    None,
    Entered,
    Exited,
}

/// Box that reports when the player crosses its boundary.
///
/// A matching sensor collider is registered so ray probes report the
/// volume as a trigger and pass through it.
#[derive(Debug, Clone)]
pub struct TriggerVolume {
    pub name: String,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub sensor: ColliderHandle,
    occupied: bool,
}

impl TriggerVolume {
    pub fn new(
        physics: &mut PhysicsWorld,
        name: impl Into<String>,
        center: Vec3,
        half_extents: Vec3,
    ) -> Self {
        Self {
            name: name.into(),
            center,
            half_extents,
            sensor: physics.add_trigger_cuboid(center, half_extents),
            occupied: false,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).abs().cmple(self.half_extents).all()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Track `point` and report boundary crossings.
    pub fn update(&mut self, point: Vec3) -> TriggerEvent {
        let inside = self.contains(point);
        let event = match (self.occupied, inside) {
            (false, true) => TriggerEvent::Entered,
            (true, false) => TriggerEvent::Exited,
            _ => TriggerEvent::None,
        };
        self.occupied = inside;
        event
    }
}

/// Trigger that recolours every hazard when the player walks in.
pub struct ColorZone {
    pub volume: TriggerVolume,
    pub tint: Tint,
}

impl ColorZone {
    pub fn new(volume: TriggerVolume, tint: Tint) -> Self {
        Self { volume, tint }
    }

    /// Returns true when the zone fired this tick.
    pub fn update(&mut self, player: Vec3, spawner: &mut HazardSpawner, world: &mut World) -> bool {
        if self.volume.update(player) != TriggerEvent::Entered {
            return false;
        }
        log::info!("Player entered {}", self.volume.name);
        spawner.set_hazard_color(world, self.tint);
        true
    }
}
