//! Arena configuration (tick rate, NPC tuning, spawner ramps, terrain). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent arena settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub hover: HoverConfig,
    #[serde(default)]
    pub defensive: DefensiveConfig,
    #[serde(default)]
    pub spawner: SpawnerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub terrain: TerrainSettings,
}

/// Tick driver settings for the headless binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed simulation rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Simulated session length in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Pace ticks against the wall clock instead of running flat out.
    #[serde(default)]
    pub realtime: bool,
    /// RNG seed; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Seconds between status lines in the log.
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: f32,
}

fn default_tick_rate() -> f64 {
    60.0
}
fn default_duration() -> f32 {
    120.0
}
fn default_report_interval() -> f32 {
    10.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            duration_secs: default_duration(),
            realtime: false,
            seed: None,
            report_interval_secs: default_report_interval(),
        }
    }
}

/// Tuning for hovering patrol agents. Angles are in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub hover_height: f32,
    pub speed: f32,
    pub chase_speed_multiplier: f32,
    /// Full field-of-view cone angle.
    pub search_fov: f32,
    pub detection_distance: f32,
    pub contact_distance: f32,
    pub delay_at_point: f32,
    pub search_duration: f32,
    pub lost_search_duration: f32,
    pub stationary_pivot_duration: f32,
    pub stationary_pause_duration: f32,
    pub wall_pivot_duration: f32,
    /// Height of the eye above the agent's origin.
    pub eye_height: f32,
    pub default_tint: [f32; 4],
    pub alert_tint: [f32; 4],
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hover_height: 1.0,
            speed: 3.0,
            chase_speed_multiplier: 2.0,
            search_fov: 60.0,
            detection_distance: 10.0,
            contact_distance: 1.0,
            delay_at_point: 1.0,
            search_duration: 1.0,
            lost_search_duration: 3.0,
            stationary_pivot_duration: 2.0,
            stationary_pause_duration: 1.0,
            wall_pivot_duration: 2.0,
            eye_height: 1.0,
            default_tint: [1.0, 1.0, 1.0, 1.0],
            alert_tint: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Tuning for defensive (fleeing) ground agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefensiveConfig {
    pub detection_radius: f32,
    /// Flee again from a safe location when the target is this close.
    pub min_distance_threshold: f32,
    /// Poll interval while at or returning to the original position.
    pub check_interval: f32,
    /// Poll interval while heading to or holding a safe location.
    pub safe_check_interval: f32,
    pub flee_speed: f32,
    pub return_speed: f32,
    pub arrival_distance: f32,
    pub velocity_threshold: f32,
    pub position_change_threshold: f32,
    /// Navigation agent acceleration (units/s²).
    pub acceleration: f32,
}

impl Default for DefensiveConfig {
    fn default() -> Self {
        Self {
            detection_radius: 50.0,
            min_distance_threshold: 25.0,
            check_interval: 5.0,
            safe_check_interval: 2.0,
            flee_speed: 5.0,
            return_speed: 2.5,
            arrival_distance: 0.5,
            velocity_threshold: 0.2,
            position_change_threshold: 1.0,
            acceleration: 8.0,
        }
    }
}

/// Hazard spawner ramps and geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// How far ground hazards rise out of the terrain.
    pub ground_spawn_height: f32,
    pub rise_duration: f32,
    pub initial_follow_speed: f32,
    pub follow_speed_increase: f32,
    pub sky_spawn_height: f32,
    pub fall_speed: f32,
    /// Seconds between ground spawns at session start.
    pub initial_ground_rate: f32,
    /// Seconds between sky spawns at session start.
    pub initial_sky_rate: f32,
    /// Shared floor for both spawn intervals.
    pub min_rate: f32,
    pub ground_rate_increase: f32,
    pub sky_rate_increase: f32,
    pub min_bounds: [f32; 3],
    pub max_bounds: [f32; 3],
    /// Distance at which a hazard touches the target.
    pub hit_radius: f32,
    /// Sky hazards with no ground beneath are removed below this height.
    pub kill_floor_y: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            ground_spawn_height: 1.0,
            rise_duration: 0.5,
            initial_follow_speed: 2.0,
            follow_speed_increase: 0.05,
            sky_spawn_height: 20.0,
            fall_speed: 5.0,
            initial_ground_rate: 2.0,
            initial_sky_rate: 3.0,
            min_rate: 0.5,
            ground_rate_increase: 0.1,
            sky_rate_increase: 0.05,
            min_bounds: [-10.0, 0.0, -10.0],
            max_bounds: [10.0, 20.0, 10.0],
            hit_radius: 1.0,
            kill_floor_y: -50.0,
        }
    }
}

/// Player motor and hit feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub turn_smooth_time: f32,
    pub height_offset: f32,
    pub height_smooth_time: f32,
    pub capsule_height: f32,
    pub capsule_radius: f32,
    pub gravity: f32,
    pub jump_force: f32,
    /// Minimum seconds between counted hits.
    pub hit_cooldown: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            turn_smooth_time: 0.1,
            height_offset: 0.5,
            height_smooth_time: 0.1,
            capsule_height: 2.0,
            capsule_radius: 0.5,
            gravity: 9.81,
            jump_force: 5.0,
            hit_cooldown: 3.0,
        }
    }
}

/// Gate actuator timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub move_distance: f32,
    pub move_speed: f32,
    /// Zero or negative keeps gates open forever.
    pub close_speed: f32,
    pub close_delay: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            move_distance: 5.0,
            move_speed: 2.0,
            close_speed: 2.0,
            close_delay: 15.0,
        }
    }
}

/// Arena floor. A flat ground plane is used when disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub enabled: bool,
    pub seed: u64,
    pub size: f32,
    pub resolution: u32,
    pub height_scale: f32,
    pub frequency: f64,
    pub octaves: u32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 1337,
            size: 120.0,
            resolution: 64,
            height_scale: 2.0,
            frequency: 0.03,
            octaves: 4,
        }
    }
}

impl TerrainSettings {
    /// Generator input for these settings.
    pub fn to_terrain_config(&self) -> procgen::TerrainConfig {
        procgen::TerrainConfig {
            size: self.size,
            resolution: self.resolution,
            height_scale: self.height_scale,
            frequency: self.frequency,
            octaves: self.octaves,
            seed: self.seed,
            ..Default::default()
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::from_ron_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Parse a RON document; absent sections and fields take their defaults.
    pub fn from_ron_str(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = GameConfig::from_ron_str("()").expect("valid ron");
        assert_eq!(config.sim.tick_rate_hz, 60.0);
        assert_eq!(config.hover.search_fov, 60.0);
        assert_eq!(config.defensive.min_distance_threshold, 25.0);
        assert_eq!(config.spawner.max_bounds, [10.0, 20.0, 10.0]);
        assert_eq!(config.gate.close_delay, 15.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GameConfig::from_ron_str(
            "(sim: (seed: Some(7), duration_secs: 30.0), hover: (speed: 4.5), gate: (close_speed: 0.0))",
        )
        .expect("valid ron");
        assert_eq!(config.sim.seed, Some(7));
        assert_eq!(config.sim.duration_secs, 30.0);
        assert_eq!(config.sim.tick_rate_hz, 60.0);
        assert_eq!(config.hover.speed, 4.5);
        assert_eq!(config.hover.detection_distance, 10.0);
        assert_eq!(config.gate.close_speed, 0.0);
        assert_eq!(config.gate.move_distance, 5.0);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("arena-config-{}.ron", std::process::id()));
        std::fs::write(&path, "(sim: (tick_rate_hz: \"fast\"))").expect("temp file");
        let config = GameConfig::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.sim.tick_rate_hz, 60.0);

        let missing = GameConfig::load_from(Path::new("/definitely/not/here/config.ron"));
        assert_eq!(missing.spawner.fall_speed, 5.0);
    }

    #[test]
    fn saved_text_parses_back() {
        let mut config = GameConfig::default();
        config.spawner.min_rate = 0.75;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let parsed = GameConfig::from_ron_str(&text).expect("parse");
        assert_eq!(parsed.spawner.min_rate, 0.75);
    }
}
