//! Arena Sim - headless chase/obstacle arena driven at a fixed tick rate

use std::time::Duration;

use anyhow::{bail, Result};
use engine_core::Time;
use game::{build_arena, GameConfig, ScriptedPilot};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                           Arena Sim                              ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  config.ron in the working directory overrides the defaults      ║");
    println!("║    --write-config  - Write the current config to config.ron      ║");
    println!("║    RUST_LOG=debug  - Log every NPC state change                  ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let config = GameConfig::load();
    if std::env::args().skip(1).any(|arg| arg == "--write-config") {
        config.save();
        log::info!("Wrote config.ron");
        return Ok(());
    }
    if config.sim.tick_rate_hz.is_nan() || config.sim.tick_rate_hz <= 0.0 {
        bail!("sim.tick_rate_hz must be positive (got {})", config.sim.tick_rate_hz);
    }

    log::info!(
        "Starting arena simulation: {:.0}s at {} Hz{}",
        config.sim.duration_secs,
        config.sim.tick_rate_hz,
        if config.sim.realtime { " (real time)" } else { "" }
    );

    let mut state = build_arena(&config)?;
    let mut pilot = ScriptedPilot::new();
    let mut time = Time::new();
    time.set_fixed_rate(config.sim.tick_rate_hz);
    let dt = time.fixed_timestep_seconds();
    let mut next_report = 0.0;

    while state.elapsed < config.sim.duration_secs {
        if config.sim.realtime {
            std::thread::sleep(Duration::from_millis(1));
            time.update();
        } else {
            time.advance(time.fixed_timestep());
        }

        while time.should_fixed_update() {
            let input = pilot.input(state.player.position(), state.elapsed, dt);
            state.update(dt, &input);

            if state.elapsed >= next_report {
                log::info!("{}", state.status());
                next_report += config.sim.report_interval_secs.max(dt);
            }
        }
    }

    log::info!(
        "Session over after {} ({} ticks): {} hits taken, {} hazards live",
        state.spawner.time_elapsed_str(),
        state.tick_count,
        state.player.hits.hit_count(),
        state.spawner.live_count()
    );
    Ok(())
}
