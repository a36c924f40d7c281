//! Collision groups (layers) and query masks.

use rapier3d::prelude::*;

/// Collision groups for the different kinds of arena geometry.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Walkable terrain: ground plane and heightfields.
    Ground = 1 << 0,
    /// Static obstacles that block movement and sight (walls, pillars, gates).
    Environment = 1 << 1,
    /// The tracked player character.
    Player = 1 << 2,
    /// Trigger volumes (colour zones, gate buttons).
    Trigger = 1 << 3,
}

impl CollisionGroup {
    const ALL_LAYERS: [CollisionGroup; 4] = [
        CollisionGroup::Ground,
        CollisionGroup::Environment,
        CollisionGroup::Player,
        CollisionGroup::Trigger,
    ];

    /// This layer as a query mask.
    pub fn mask(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Mask matching every layer.
    pub fn all() -> Group {
        Group::ALL
    }

    /// Mask used for sight lines: everything except trigger volumes.
    pub fn line_of_sight() -> Group {
        Group::ALL.difference(Self::Trigger.mask())
    }

    /// Layer a collider belongs to, from its membership bits.
    pub fn from_memberships(memberships: Group) -> Option<Self> {
        Self::ALL_LAYERS
            .into_iter()
            .find(|layer| memberships.contains(layer.mask()))
    }

    /// Interaction groups for terrain.
    pub fn ground() -> InteractionGroups {
        InteractionGroups::new(Self::Ground.mask(), Group::ALL)
    }

    /// Interaction groups for walls and other blocking props.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::Environment.mask(), Group::ALL)
    }

    /// Interaction groups for the player capsule.
    pub fn player() -> InteractionGroups {
        InteractionGroups::new(Self::Player.mask(), Group::ALL)
    }

    /// Interaction groups for trigger sensors.
    pub fn trigger() -> InteractionGroups {
        InteractionGroups::new(Self::Trigger.mask(), Group::ALL)
    }
}
