//! Common ECS components used across the engine.

/// RGBA colour tag attached to anything whose appearance scripts may change
/// (hazards, indicator lights, the player, gate buttons).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint(pub [f32; 4]);

impl Tint {
    pub const WHITE: Tint = Tint([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Tint = Tint([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Tint = Tint([0.0, 1.0, 0.0, 1.0]);
    pub const YELLOW: Tint = Tint([1.0, 0.92, 0.016, 1.0]);
    pub const ORANGE: Tint = Tint([1.0, 0.5, 0.0, 1.0]);

    pub fn rgba(&self) -> [f32; 4] {
        self.0
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

impl From<[f32; 4]> for Tint {
    fn from(rgba: [f32; 4]) -> Self {
        Tint(rgba)
    }
}
