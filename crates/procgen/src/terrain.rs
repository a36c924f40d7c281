//! Terrain heightmap generation using noise functions.
//!
//! **Seed-based determinism:** All noise is derived from `config.seed` so the same
//! seed always produces the same arena floor at every (world_x, world_z).

use noise::{NoiseFn, Perlin, Simplex};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for terrain generation.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Size of terrain in world units (square, centred on the origin).
    pub size: f32,
    /// Number of samples per side.
    pub resolution: u32,
    /// Maximum height of terrain.
    pub height_scale: f32,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    /// Seed for random generation.
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 120.0,
            resolution: 64,
            height_scale: 3.0,
            frequency: 0.03,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
        }
    }
}

/// Generated heightmap, row-major with rows along Z (index = z * resolution + x).
#[derive(Debug, Clone)]
pub struct TerrainData {
    pub heightmap: Vec<f32>,
    pub config: TerrainConfig,
}

impl TerrainData {
    /// Generate terrain from configuration. Resolutions below 2 are raised to 2.
    pub fn generate(mut config: TerrainConfig) -> Self {
        config.resolution = config.resolution.max(2);
        let perlin = Perlin::new(deterministic_noise_seed(config.seed, 0));
        let simplex = Simplex::new(deterministic_noise_seed(config.seed, 1));

        let res = config.resolution as usize;
        let step = config.size / (config.resolution - 1) as f32;
        let mut heightmap = Vec::with_capacity(res * res);

        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - config.size / 2.0;
                let world_z = z as f32 * step - config.size / 2.0;
                let height =
                    Self::fractal_noise(&perlin, &simplex, world_x as f64, world_z as f64, &config);
                heightmap.push(height as f32 * config.height_scale);
            }
        }

        log::debug!(
            "Generated {}x{} terrain (seed {}, size {})",
            res,
            res,
            config.seed,
            config.size
        );

        Self { heightmap, config }
    }

    /// Samples per side.
    pub fn resolution(&self) -> usize {
        self.config.resolution as usize
    }

    /// Check if a world position is within the terrain bounds.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let half = self.config.size / 2.0;
        x >= -half && x <= half && z >= -half && z <= half
    }

    fn fractal_noise(
        perlin: &Perlin,
        simplex: &Simplex,
        x: f64,
        z: f64,
        config: &TerrainConfig,
    ) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = config.frequency;
        let mut max_value = 0.0;

        for _ in 0..config.octaves.max(1) {
            // Mix Perlin and Simplex for variety
            let perlin_sample = perlin.get([x * frequency, z * frequency]);
            let simplex_sample = simplex.get([x * frequency + 1000.0, z * frequency + 1000.0]);

            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;

            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        // Normalize to 0-1 range
        ((value / max_value + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_deterministic_same_seed() {
        let config = TerrainConfig {
            size: 64.0,
            resolution: 24,
            height_scale: 15.0,
            seed: 98765,
            ..Default::default()
        };
        let a = TerrainData::generate(config.clone());
        let b = TerrainData::generate(config);
        assert_eq!(a.heightmap.len(), 24 * 24);
        assert_eq!(a.heightmap, b.heightmap);
    }

    #[test]
    fn terrain_different_seed_different_heights() {
        let config_a = TerrainConfig {
            size: 64.0,
            resolution: 24,
            seed: 11111,
            ..Default::default()
        };
        let config_b = TerrainConfig {
            seed: 22222,
            ..config_a.clone()
        };
        let a = TerrainData::generate(config_a);
        let b = TerrainData::generate(config_b);
        assert_ne!(a.heightmap, b.heightmap);
    }

    #[test]
    fn heights_stay_within_scale_and_bounds_are_inclusive() {
        let terrain = TerrainData::generate(TerrainConfig {
            size: 10.0,
            resolution: 11,
            height_scale: 4.0,
            seed: 7,
            ..Default::default()
        });
        assert!(terrain.heightmap.iter().all(|h| (0.0..=4.0).contains(h)));

        assert!(terrain.contains(5.0, -5.0));
        assert!(!terrain.contains(5.1, 0.0));
    }
}
