//! The End island field, matching vanilla's `EndIslandDensityFunction`.
//!
//! A distance falloff from the origin is combined with simplex-noise-placed
//! islands in a 25x25 chunk neighbourhood. Output lies in `[-0.84375, 0.5625]`.

use crate::noise::SimplexNoise;
use crate::random::Random;
use crate::random::legacy_random::LegacyRandom;

/// Draws skipped before the island noise is built.
const ISLAND_SKIP: u32 = 17_292;

/// Vanilla compares a double against `-0.9F`, which widens to
/// `-0.8999999761581421`.
const ISLAND_THRESHOLD: f64 = -0.9_f32 as f64;

/// Seeded End island sampler.
#[derive(Debug, Clone)]
pub struct EndIslands {
    island_noise: SimplexNoise,
}

impl EndIslands {
    /// Seed from the world seed: `LegacyRandom(seed)`, skip 17292 draws, then
    /// build the simplex noise.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = LegacyRandom::from_seed(seed);
        rng.consume_count(ISLAND_SKIP);
        Self {
            island_noise: SimplexNoise::new(&mut rng),
        }
    }

    /// Density at a block column.
    #[must_use]
    pub fn sample(&self, block_x: i32, block_z: i32) -> f64 {
        // The float height widens before `- 8.0`.
        (f64::from(self.height_value(block_x / 8, block_z / 8)) - 8.0) / 128.0
    }

    /// Island height at section coordinates (block / 8).
    fn height_value(&self, section_x: i32, section_z: i32) -> f32 {
        let chunk_x = section_x / 2;
        let chunk_z = section_z / 2;
        let sub_x = section_x % 2;
        let sub_z = section_z % 2;

        // Integer square first, wrapping like the JVM, then widened to float.
        let dist_sq = section_x
            .wrapping_mul(section_x)
            .wrapping_add(section_z.wrapping_mul(section_z));
        let mut height = (100.0_f32 - (dist_sq as f32).sqrt() * 8.0).clamp(-100.0, 80.0);

        for xo in -12..=12 {
            for zo in -12..=12 {
                let cx = i64::from(chunk_x) + i64::from(xo);
                let cz = i64::from(chunk_z) + i64::from(zo);
                if cx * cx + cz * cz <= 4096
                    || self.island_noise.get_value_2d(cx as f64, cz as f64) >= ISLAND_THRESHOLD
                {
                    continue;
                }
                let size = ((cx as f32).abs() * 3439.0 + (cz as f32).abs() * 147.0) % 13.0 + 9.0;
                let dx = sub_x as f32 - (xo * 2) as f32;
                let dz = sub_z as f32 - (zo * 2) as f32;
                let island = (100.0_f32 - (dx * dx + dz * dz).sqrt() * size).clamp(-100.0, 80.0);
                height = height.max(island);
            }
        }

        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_island_peaks_at_origin() {
        let islands = EndIslands::new(0);
        // At the origin the falloff is 100, clamped to 80: (80 - 8) / 128.
        assert!((islands.sample(0, 0) - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn output_is_bounded() {
        let islands = EndIslands::new(42);
        for (x, z) in [(0, 0), (1000, 0), (-5000, 7000), (20_000, 20_000), (-123_456, 98_765)] {
            let v = islands.sample(x, z);
            assert!((-0.84375..=0.5625).contains(&v), "({x}, {z}) -> {v}");
        }
    }

    #[test]
    fn void_between_main_island_and_outer_islands() {
        let islands = EndIslands::new(7);
        // Within 1024 blocks of the origin but past the main island falloff no
        // outer island can spawn, so the clamp floor is reached.
        assert!((islands.sample(800, 0) + 0.84375).abs() < 1e-12);
    }
}
