//! Arena gameplay: hovering patrol NPCs, defensive NPCs, hazard spawning,
//! trigger zones and gates, driven one fixed tick at a time.

pub mod arena;
pub mod config;
pub mod defensive;
pub mod error;
pub mod gate;
pub mod hazard;
pub mod hover;
pub mod navigation;
pub mod patrol;
pub mod perception;
pub mod player;
pub mod spawner;
pub mod state;
pub mod trigger;
pub mod update;

pub use arena::{build_arena, ScriptedPilot};
pub use config::GameConfig;
pub use error::ConfigError;
pub use player::{HitReceiver, PlayerInput};
pub use state::{GameState, StatusReport};
