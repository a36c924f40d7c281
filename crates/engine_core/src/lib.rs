//! Core engine types and utilities for the arena simulation.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and yaw helpers for ground/hover agents
//! - Time management (frame clock and fixed-step accumulator)
//! - Easing helpers (smooth damp, move towards)
//! - Common component types for ECS

pub mod components;
pub mod math;
pub mod time;
pub mod transform;

pub use components::*;
pub use math::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
