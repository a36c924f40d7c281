//! Demo arena: terrain, walls, NPCs, colour zones and a gate, laid out from config.

use anyhow::{anyhow, bail, Context, Result};
use engine_core::{yaw_for_direction, Tint, Vec3};
use hecs::World;
use physics::{ColliderHandle, PhysicsWorld, SceneQuery};
use procgen::TerrainData;
use rand::prelude::*;

use crate::config::GameConfig;
use crate::defensive::DefensiveNpc;
use crate::gate::GateController;
use crate::hover::HoverNpc;
use crate::patrol::Waypoint;
use crate::player::{Player, PlayerInput};
use crate::spawner::HazardSpawner;
use crate::state::GameState;
use crate::trigger::{ColorZone, TriggerVolume};

/// Half width of the walled play area.
pub const ARENA_HALF_EXTENT: f32 = 28.0;
const WALL_HEIGHT: f32 = 4.0;

pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const YELLOW_ZONE: Vec3 = Vec3::new(-10.0, 0.0, 10.0);
pub const ORANGE_ZONE: Vec3 = Vec3::new(0.0, 0.0, 18.0);
pub const RED_ZONE: Vec3 = Vec3::new(10.0, 0.0, 10.0);
pub const GATE_BUTTON: Vec3 = Vec3::new(0.0, 0.0, -20.0);

/// Build the arena described by `config`. Randomness comes from
/// `config.sim.seed` when set.
pub fn build_arena(config: &GameConfig) -> Result<GameState> {
    let mut rng = match config.sim.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut physics = PhysicsWorld::new();
    if config.terrain.enabled {
        let data = TerrainData::generate(config.terrain.to_terrain_config());
        let e = ARENA_HALF_EXTENT;
        if !data.contains(-e, -e) || !data.contains(e, e) {
            bail!(
                "terrain size {} does not cover the {}-unit arena",
                data.config.size,
                2.0 * e
            );
        }
        let res = data.resolution();
        physics
            .add_terrain_heightfield(&data.heightmap, res, res, data.config.size, data.config.size)
            .ok_or_else(|| anyhow!("terrain heightfield rejected ({}x{})", res, res))?;
        log::info!(
            "Generated {}x{} terrain, {:.0} units across (seed {})",
            res,
            res,
            data.config.size,
            data.config.seed
        );
    } else {
        physics.add_ground_plane();
    }
    physics.update_query_pipeline();

    build_walls(&mut physics);
    let gate_slots = build_gate_pieces(&mut physics);

    let player_cfg = config.player.clone();
    let half_height = (player_cfg.capsule_height / 2.0 - player_cfg.capsule_radius).max(0.0);
    let capsule = physics.add_player_capsule(PLAYER_START, half_height, player_cfg.capsule_radius);
    physics.update_query_pipeline();
    let mut player = Player::new(PLAYER_START, capsule, player_cfg);
    player.snap_to_ground(&physics);
    physics.set_collider_translation(capsule, player.position());

    let zones = [
        ("yellow zone", YELLOW_ZONE, Tint::YELLOW),
        ("orange zone", ORANGE_ZONE, Tint::ORANGE),
        ("red zone", RED_ZONE, Tint::RED),
    ];
    let mut color_zones = Vec::with_capacity(zones.len());
    for (name, point, tint) in zones {
        let center = on_ground(&physics, point, 2.0);
        let volume = TriggerVolume::new(&mut physics, name, center, Vec3::splat(2.0));
        color_zones.push(ColorZone::new(volume, tint));
    }

    let button_center = on_ground(&physics, GATE_BUTTON, 1.5);
    let button = TriggerVolume::new(&mut physics, "gate button", button_center, Vec3::splat(1.5));
    let gate = GateController::new("north gate", &config.gate, button, Tint::YELLOW, gate_slots)
        .context("building the north gate")?;

    let hover_npcs = build_hover_npcs(config, &physics)?;

    let critter_home = on_ground(&physics, Vec3::new(-18.0, 0.0, 18.0), 0.0);
    let safe_slots = [
        Some(on_ground(&physics, Vec3::new(-24.0, 0.0, -20.0), 0.0)),
        None,
        Some(on_ground(&physics, Vec3::new(22.0, 0.0, 22.0), 0.0)),
        Some(on_ground(&physics, Vec3::new(-22.0, 0.0, 0.0), 0.0)),
    ];
    let critter = DefensiveNpc::new(
        "critter",
        &config.defensive,
        critter_home,
        &safe_slots,
        &physics,
        StdRng::seed_from_u64(rng.gen()),
    )
    .context("building the defensive NPC")?;

    let spawner = HazardSpawner::new(&config.spawner, StdRng::seed_from_u64(rng.gen()))
        .context("building the hazard spawner")?;

    physics.update_query_pipeline();
    log::info!(
        "Arena ready: {} hover NPCs, 1 defensive NPC, {} colour zones, 1 gate",
        hover_npcs.len(),
        color_zones.len()
    );

    Ok(GameState {
        config: config.clone(),
        physics,
        world: World::new(),
        player,
        hover_npcs,
        defensive_npcs: vec![critter],
        spawner,
        color_zones,
        gates: vec![gate],
        elapsed: 0.0,
        tick_count: 0,
    })
}

/// `point` moved onto the terrain, lifted by `lift`.
fn on_ground<Q: SceneQuery + ?Sized>(query: &Q, point: Vec3, lift: f32) -> Vec3 {
    let ground = query.ground_height(point.x, point.z).unwrap_or(0.0);
    Vec3::new(point.x, ground + lift, point.z)
}

fn build_walls(physics: &mut PhysicsWorld) {
    let e = ARENA_HALF_EXTENT;
    let h = WALL_HEIGHT / 2.0;
    // (center x, center z, half x, half z)
    let walls = [
        (0.0, e, e, 0.5),
        (e, 0.0, 0.5, e),
        (-e, 0.0, 0.5, e),
        // North wall leaves a 8-unit opening for the gate.
        (-(e + 4.0) / 2.0, -e, (e - 4.0) / 2.0, 0.5),
        ((e + 4.0) / 2.0, -e, (e - 4.0) / 2.0, 0.5),
        // Pillars.
        (6.0, -6.0, 1.0, 1.0),
        (-6.0, 4.0, 1.0, 1.0),
    ];
    for (x, z, hx, hz) in walls {
        let center = on_ground(&*physics, Vec3::new(x, 0.0, z), h);
        physics.add_static_cuboid(center, 0.0, Vec3::new(hx, h, hz));
    }
}

fn build_gate_pieces(physics: &mut PhysicsWorld) -> Vec<Option<(ColliderHandle, Vec3)>> {
    let h = WALL_HEIGHT / 2.0;
    [-2.0, 2.0]
        .into_iter()
        .map(|x| {
            let closed = on_ground(&*physics, Vec3::new(x, 0.0, -ARENA_HALF_EXTENT), h);
            let collider = physics.add_static_cuboid(closed, 0.0, Vec3::new(2.0, h, 0.25));
            Some((collider, closed))
        })
        .collect()
}

fn build_hover_npcs(config: &GameConfig, physics: &PhysicsWorld) -> Result<Vec<HoverNpc>> {
    let route = vec![
        Waypoint::stop(Vec3::new(-12.0, 0.0, -12.0)),
        Waypoint::search(Vec3::new(0.0, 0.0, -14.0), true, 60.0),
        Waypoint::stop(Vec3::new(12.0, 0.0, -12.0)),
        Waypoint::search(Vec3::new(14.0, 0.0, 0.0), false, 45.0),
    ];
    let start = on_ground(physics, route[0].position, config.hover.hover_height);
    let patroller = HoverNpc::new("patroller", &config.hover, start, 0.0, route, false)
        .context("building the patrolling hover NPC")?;

    let post = on_ground(physics, Vec3::new(20.0, 0.0, -20.0), config.hover.hover_height);
    let facing = yaw_for_direction(-post).unwrap_or(0.0);
    let sentry = HoverNpc::new("sentry", &config.hover, post, facing, Vec::new(), true)
        .context("building the stationary hover NPC")?;

    Ok(vec![patroller, sentry])
}

/// Walks the player around a fixed tour of the arena's points of interest.
#[derive(Debug, Clone)]
pub struct ScriptedPilot {
    tour: Vec<Vec3>,
    next: usize,
    jump_interval: f32,
}

impl Default for ScriptedPilot {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPilot {
    pub fn new() -> Self {
        Self {
            tour: vec![
                RED_ZONE,
                Vec3::new(0.0, 0.0, 0.0),
                GATE_BUTTON,
                Vec3::new(-12.0, 0.0, -8.0),
                YELLOW_ZONE,
                ORANGE_ZONE,
                PLAYER_START,
            ],
            next: 0,
            jump_interval: 6.0,
        }
    }

    /// Input steering from `position` toward the next tour stop.
    pub fn input(&mut self, position: Vec3, elapsed: f32, dt: f32) -> PlayerInput {
        let Some(&goal) = self.tour.get(self.next) else {
            return PlayerInput::default();
        };
        let offset = Vec3::new(goal.x - position.x, 0.0, goal.z - position.z);
        if offset.length() < 1.0 {
            self.next = (self.next + 1) % self.tour.len();
        }
        PlayerInput {
            move_dir: offset.normalize_or_zero(),
            jump: elapsed % self.jump_interval < dt,
        }
    }
}
