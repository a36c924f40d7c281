//! Arena state: everything one simulation tick reads and writes.

use std::fmt;

use hecs::World;
use physics::PhysicsWorld;

use crate::config::GameConfig;
use crate::defensive::{DefensiveNpc, DefensiveState};
use crate::gate::{GateController, GatePhase};
use crate::hover::HoverNpc;
use crate::player::Player;
use crate::spawner::HazardSpawner;
use crate::trigger::ColorZone;

/// The whole simulated arena. Built by [`crate::arena::build_arena`] and
/// advanced by [`GameState::update`].
pub struct GameState {
    pub config: GameConfig,
    /// Static geometry, triggers, gates and the player capsule.
    pub physics: PhysicsWorld,
    /// Hazard entities.
    pub world: World,
    pub player: Player,
    pub hover_npcs: Vec<HoverNpc>,
    pub defensive_npcs: Vec<DefensiveNpc>,
    pub spawner: HazardSpawner,
    pub color_zones: Vec<ColorZone>,
    pub gates: Vec<GateController>,
    /// Simulated seconds since the session started.
    pub elapsed: f32,
    pub tick_count: u64,
}

impl GameState {
    /// Snapshot for periodic log lines.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            time: self.spawner.time_elapsed_str(),
            ticks: self.tick_count,
            hits: self.player.hits.hit_count(),
            permanently_red: self.player.hits.is_permanently_red(),
            live_hazards: self.spawner.live_count(),
            ground_rate: self.spawner.ground_rate(),
            sky_rate: self.spawner.sky_rate(),
            follow_speed: self.spawner.follow_speed(),
            hover: self
                .hover_npcs
                .iter()
                .map(|npc| (npc.name.clone(), npc.state().name()))
                .collect(),
            defensive: self
                .defensive_npcs
                .iter()
                .map(|npc| (npc.name.clone(), npc.state()))
                .collect(),
            gates: self.gates.iter().map(|g| g.phase()).collect(),
        }
    }
}

/// One line of arena status.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub time: String,
    pub ticks: u64,
    pub hits: u32,
    pub permanently_red: bool,
    pub live_hazards: usize,
    pub ground_rate: f32,
    pub sky_rate: f32,
    pub follow_speed: f32,
    pub hover: Vec<(String, &'static str)>,
    pub defensive: Vec<(String, DefensiveState)>,
    pub gates: Vec<GatePhase>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] hits {}{} | hazards {} (ground {:.2}s, sky {:.2}s, follow {:.2}) |",
            self.time,
            self.hits,
            if self.permanently_red { " (red)" } else { "" },
            self.live_hazards,
            self.ground_rate,
            self.sky_rate,
            self.follow_speed,
        )?;
        for (name, state) in &self.hover {
            write!(f, " {}: {}", name, state)?;
        }
        for (name, state) in &self.defensive {
            write!(f, " {}: {:?}", name, state)?;
        }
        for (i, phase) in self.gates.iter().enumerate() {
            write!(f, " gate{}: {:?}", i, phase)?;
        }
        Ok(())
    }
}
