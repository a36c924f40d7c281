//! Per-tick arena advancement.
//!
//! Order within a tick: player motor, query refresh, trigger volumes, hover
//! NPCs, defensive NPCs, hazard spawning and motion, hazard hits, player
//! visual timers.

use crate::player::PlayerInput;
use crate::state::GameState;

impl GameState {
    /// Advance the arena by one fixed tick.
    pub fn update(&mut self, dt: f32, input: &PlayerInput) {
        tick(self, dt, input);
    }
}

/// Run one tick of gameplay.
pub fn tick(state: &mut GameState, dt: f32, input: &PlayerInput) {
    // Player first so NPC perception sees where it ends up.
    state.player.update_motor(&state.physics, input, dt);
    let player_pos = state.player.position();
    if !state
        .physics
        .set_collider_translation(state.player.collider, player_pos)
    {
        log::warn!("Player collider missing from the physics world");
    }
    state.physics.update_query_pipeline();

    for zone in &mut state.color_zones {
        zone.update(player_pos, &mut state.spawner, &mut state.world);
    }
    let mut gates_moved = false;
    for gate in &mut state.gates {
        gates_moved |= gate.update(&mut state.physics, player_pos, dt);
    }
    if gates_moved {
        state.physics.update_query_pipeline();
    }

    let target = state.player.as_target();
    for npc in &mut state.hover_npcs {
        npc.update(&state.physics, &target, &mut state.player.hits, dt);
    }
    for npc in &mut state.defensive_npcs {
        npc.update(&state.physics, player_pos, dt);
    }

    state
        .spawner
        .update(&mut state.world, &state.physics, player_pos, dt);
    state
        .spawner
        .resolve_collisions(&mut state.world, player_pos, &mut state.player.hits);

    state.player.update_visuals(dt);

    state.elapsed += dt;
    state.tick_count += 1;
}
