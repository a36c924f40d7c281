//! Button-operated gates that sink into the floor and rise again later.

use engine_core::{move_towards, Tint, Vec3};
use physics::{ColliderHandle, PhysicsWorld};

use crate::config::GateConfig;
use crate::error::{non_negative, positive, ConfigError};
use crate::trigger::{TriggerEvent, TriggerVolume};

/// Gates closer than this to their goal count as arrived.
const GATE_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GatePhase {
    Idle,
    Opening,
    /// Fully open; `elapsed` counts toward the close delay.
    Open { elapsed: f32 },
    Closing,
}

#[derive(Debug, Clone, Copy)]
struct Gate {
    collider: ColliderHandle,
    closed: Vec3,
    open: Vec3,
    position: Vec3,
}

pub struct GateController {
    pub name: String,
    pub button: TriggerVolume,
    pub button_tint: Tint,
    original_tint: Tint,
    gates: Vec<Gate>,
    phase: GatePhase,
    config: GateConfig,
}

impl GateController {
    /// `gates` holds one slot per gate: its collider and closed position.
    pub fn new(
        name: impl Into<String>,
        config: &GateConfig,
        button: TriggerVolume,
        button_tint: Tint,
        gates: Vec<Option<(ColliderHandle, Vec3)>>,
    ) -> Result<Self, ConfigError> {
        positive("move_speed", config.move_speed)?;
        non_negative("move_distance", config.move_distance)?;
        non_negative("close_delay", config.close_delay)?;

        let name = name.into();
        let mut assigned = Vec::with_capacity(gates.len());
        for (i, slot) in gates.into_iter().enumerate() {
            match slot {
                Some((collider, closed)) => assigned.push(Gate {
                    collider,
                    closed,
                    open: closed - Vec3::Y * config.move_distance,
                    position: closed,
                }),
                None => log::warn!("{}: gate slot {} is unassigned, skipping", name, i),
            }
        }

        Ok(Self {
            name,
            button,
            button_tint,
            original_tint: button_tint,
            gates: assigned,
            phase: GatePhase::Idle,
            config: config.clone(),
        })
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn gate_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.gates.iter().map(|g| g.position)
    }

    /// Advance one tick. Returns true when any gate collider moved.
    pub fn update(&mut self, physics: &mut PhysicsWorld, player: Vec3, dt: f32) -> bool {
        if self.button.update(player) == TriggerEvent::Entered {
            if self.phase == GatePhase::Idle {
                log::info!("{}: button pressed, opening {} gates", self.name, self.gates.len());
                self.button_tint = Tint::GREEN;
                self.phase = GatePhase::Opening;
            } else {
                log::info!("{}: button pressed while gates are busy ({:?})", self.name, self.phase);
            }
        }

        match self.phase {
            GatePhase::Idle => false,
            GatePhase::Opening => {
                let step = self.config.move_speed * dt;
                let done = self.step_gates(physics, |g| g.open, step);
                if done {
                    log::debug!("{}: gates open", self.name);
                    self.phase = GatePhase::Open { elapsed: 0.0 };
                }
                true
            }
            GatePhase::Open { elapsed } => {
                if self.config.close_speed > 0.0 {
                    let elapsed = elapsed + dt;
                    self.phase = if elapsed >= self.config.close_delay {
                        GatePhase::Closing
                    } else {
                        GatePhase::Open { elapsed }
                    };
                }
                false
            }
            GatePhase::Closing => {
                let step = self.config.close_speed * dt;
                let done = self.step_gates(physics, |g| g.closed, step);
                if done {
                    log::info!("{}: gates closed", self.name);
                    self.button_tint = self.original_tint;
                    self.phase = GatePhase::Idle;
                }
                true
            }
        }
    }

    /// Move every gate toward `goal`; true once all of them are there.
    fn step_gates(&mut self, physics: &mut PhysicsWorld, goal: fn(&Gate) -> Vec3, step: f32) -> bool {
        let mut all_arrived = true;
        for gate in &mut self.gates {
            let target = goal(gate);
            gate.position = move_towards(gate.position, target, step);
            if gate.position.distance(target) > GATE_TOLERANCE {
                all_arrived = false;
            } else {
                gate.position = target;
            }
            if !physics.set_collider_translation(gate.collider, gate.position) {
                log::warn!("{}: gate collider is gone", self.name);
            }
        }
        all_arrived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWAY: Vec3 = Vec3::new(50.0, 0.0, 50.0);
    const ON_BUTTON: Vec3 = Vec3::new(0.0, 0.5, 0.0);

    fn setup(config: GateConfig) -> (PhysicsWorld, GateController) {
        let mut physics = PhysicsWorld::new();
        let closed = Vec3::new(10.0, 2.0, 0.0);
        let wall = physics.add_static_cuboid(closed, 0.0, Vec3::new(2.0, 2.0, 0.25));
        let button = TriggerVolume::new(&mut physics, "button", Vec3::ZERO, Vec3::splat(1.0));
        let gates = GateController::new(
            "gate",
            &config,
            button,
            Tint::YELLOW,
            vec![Some((wall, closed)), None],
        )
        .unwrap();
        (physics, gates)
    }

    fn run(physics: &mut PhysicsWorld, gates: &mut GateController, player: Vec3, ticks: usize) {
        for _ in 0..ticks {
            gates.update(physics, player, 0.25);
        }
    }

    #[test]
    fn opens_waits_and_closes() {
        let config = GateConfig {
            move_distance: 4.0,
            move_speed: 2.0,
            close_speed: 4.0,
            close_delay: 3.0,
        };
        let (mut physics, mut gates) = setup(config);
        assert_eq!(gates.gate_count(), 1);

        gates.update(&mut physics, ON_BUTTON, 0.25);
        assert_eq!(gates.phase(), GatePhase::Opening);
        assert_eq!(gates.button_tint, Tint::GREEN);

        // 4 units at 2 u/s.
        run(&mut physics, &mut gates, AWAY, 7);
        assert_eq!(gates.phase(), GatePhase::Open { elapsed: 0.0 });
        let wall = gates.gates[0].collider;
        let open = physics.collider_translation(wall).unwrap();
        assert!((open.y - -2.0).abs() < 1e-4);

        run(&mut physics, &mut gates, AWAY, 11);
        assert!(matches!(gates.phase(), GatePhase::Open { .. }));
        run(&mut physics, &mut gates, AWAY, 1);
        assert_eq!(gates.phase(), GatePhase::Closing);

        run(&mut physics, &mut gates, AWAY, 4);
        assert_eq!(gates.phase(), GatePhase::Idle);
        assert_eq!(gates.button_tint, Tint::YELLOW);
        let closed = physics.collider_translation(wall).unwrap();
        assert!((closed.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zero_close_speed_stays_open() {
        let config = GateConfig {
            close_speed: 0.0,
            close_delay: 1.0,
            ..Default::default()
        };
        let (mut physics, mut gates) = setup(config);
        gates.update(&mut physics, ON_BUTTON, 0.25);
        run(&mut physics, &mut gates, AWAY, 200);
        assert_eq!(gates.phase(), GatePhase::Open { elapsed: 0.0 });
    }

    #[test]
    fn presses_while_busy_are_ignored() {
        let (mut physics, mut gates) = setup(GateConfig::default());
        gates.update(&mut physics, ON_BUTTON, 0.25);
        gates.update(&mut physics, AWAY, 0.25);
        let before = gates.gate_positions().next().unwrap();
        gates.update(&mut physics, ON_BUTTON, 0.25);
        assert_eq!(gates.phase(), GatePhase::Opening);
        // Still sinking at the normal rate.
        let after = gates.gate_positions().next().unwrap();
        assert!((before.y - after.y - 0.5).abs() < 1e-5);
    }
}
