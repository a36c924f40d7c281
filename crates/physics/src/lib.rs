//! Physics queries using Rapier3D for the arena.
//!
//! The arena never simulates rigid bodies; Rapier is used as a static scene
//! plus query pipeline. Gameplay code talks to it through [`SceneQuery`].

pub mod collision;
pub mod physics_world;
pub mod query;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use query::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, Group};
