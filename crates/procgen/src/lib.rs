//! Procedural generation for the arena terrain.

pub mod terrain;

pub use terrain::*;
