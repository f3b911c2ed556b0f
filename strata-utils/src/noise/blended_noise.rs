//! Legacy interpolated terrain noise matching vanilla's `BlendedNoise`
//! (`minecraft:old_blended_noise`).

use serde::{Deserialize, Serialize};

use crate::math::clamped_lerp;
use crate::noise::perlin_noise::wrap;
use crate::noise::{NoiseError, OctaveInit, PerlinNoise};
use crate::random::Random;

/// Base coordinate multiplier applied before the configured scales.
const MULTIPLIER: f64 = 684.412;

/// Configuration of an `old_blended_noise` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedNoiseParams {
    /// Horizontal scale, multiplied by `684.412`.
    pub xz_scale: f64,
    /// Vertical scale, multiplied by `684.412`.
    pub y_scale: f64,
    /// Horizontal divisor for the selector bank.
    pub xz_factor: f64,
    /// Vertical divisor for the selector bank.
    pub y_factor: f64,
    /// Multiplier on the vertical fudge scale.
    pub smear_scale_multiplier: f64,
}

/// Three legacy octave banks: two 16-octave limits and an 8-octave selector.
#[derive(Debug, Clone)]
pub struct BlendedNoise {
    min_limit_noise: PerlinNoise,
    max_limit_noise: PerlinNoise,
    main_noise: PerlinNoise,
    params: BlendedNoiseParams,
    xz_multiplier: f64,
    y_multiplier: f64,
    max_value: f64,
}

impl BlendedNoise {
    /// Draw the min-limit, max-limit and main banks (in that order) from `random`
    /// with legacy octave initialization.
    pub fn new<R: Random>(random: &mut R, params: BlendedNoiseParams) -> Result<Self, NoiseError> {
        let min_limit_noise = legacy_bank(random, 15)?;
        let max_limit_noise = legacy_bank(random, 15)?;
        let main_noise = legacy_bank(random, 7)?;

        let xz_multiplier = MULTIPLIER * params.xz_scale;
        let y_multiplier = MULTIPLIER * params.y_scale;
        let max_value = min_limit_noise.max_broken_value(y_multiplier);

        Ok(Self {
            min_limit_noise,
            max_limit_noise,
            main_noise,
            params,
            xz_multiplier,
            y_multiplier,
            max_value,
        })
    }

    /// Sample at a block position.
    ///
    /// The selector weight decides which limit banks can influence the result;
    /// a bank whose weight is fully saturated away is not sampled at all.
    #[must_use]
    pub fn compute(&self, block_x: i32, block_y: i32, block_z: i32) -> f64 {
        let x = f64::from(block_x) * self.xz_multiplier;
        let y = f64::from(block_y) * self.y_multiplier;
        let z = f64::from(block_z) * self.xz_multiplier;

        let main_x = x / self.params.xz_factor;
        let main_y = y / self.params.y_factor;
        let main_z = z / self.params.xz_factor;

        let smear = self.y_multiplier * self.params.smear_scale_multiplier;
        let main_smear = smear / self.params.y_factor;

        let mut main = 0.0;
        let mut scale = 1.0;
        for octave in 0..8 {
            if let Some(noise) = self.main_noise.octave_noise(octave) {
                main += noise.noise_with_y_scale(
                    wrap(main_x * scale),
                    wrap(main_y * scale),
                    wrap(main_z * scale),
                    main_smear * scale,
                    main_y * scale,
                ) / scale;
            }
            scale /= 2.0;
        }

        let selector = (main / 10.0 + 1.0) / 2.0;
        let only_max = selector >= 1.0;
        let only_min = selector <= 0.0;

        let mut min_total = 0.0;
        let mut max_total = 0.0;
        let mut scale = 1.0;
        for octave in 0..16 {
            let sx = wrap(x * scale);
            let sy = wrap(y * scale);
            let sz = wrap(z * scale);
            let y_scale = smear * scale;
            let y_max = y * scale;

            if !only_max && let Some(noise) = self.min_limit_noise.octave_noise(octave) {
                min_total += noise.noise_with_y_scale(sx, sy, sz, y_scale, y_max) / scale;
            }
            if !only_min && let Some(noise) = self.max_limit_noise.octave_noise(octave) {
                max_total += noise.noise_with_y_scale(sx, sy, sz, y_scale, y_max) / scale;
            }
            scale /= 2.0;
        }

        clamped_lerp(min_total / 512.0, max_total / 512.0, selector) / 128.0
    }

    /// The configuration this sampler was built from.
    #[must_use]
    pub const fn params(&self) -> &BlendedNoiseParams {
        &self.params
    }

    /// Upper bound of [`compute`](Self::compute) as vanilla reports it.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Octaves `-depth..=0`, every amplitude `1.0`.
fn legacy_bank<R: Random>(random: &mut R, depth: i32) -> Result<PerlinNoise, NoiseError> {
    let amplitudes = vec![1.0; (depth + 1) as usize];
    PerlinNoise::create(random, -depth, &amplitudes, OctaveInit::Legacy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::legacy_random::LegacyRandom;

    const OVERWORLD: BlendedNoiseParams = BlendedNoiseParams {
        xz_scale: 0.25,
        y_scale: 0.125,
        xz_factor: 80.0,
        y_factor: 160.0,
        smear_scale_multiplier: 8.0,
    };

    #[test]
    fn matches_reference_values() {
        let noise = BlendedNoise::new(&mut LegacyRandom::from_seed(12345), OVERWORLD)
            .expect("legacy banks have no positive octaves");
        let cases = [
            ((0, 0, 0), 0.239_426_596_677_846_55),
            ((100, 64, -200), 0.070_485_154_556_971_73),
            ((-1234, -40, 5678), -0.429_915_996_759_607_8),
        ];
        for ((x, y, z), expected) in cases {
            let v = noise.compute(x, y, z);
            assert!((v - expected).abs() < 1e-12, "({x}, {y}, {z}): {v} != {expected}");
        }
    }

    #[test]
    fn max_value_tracks_vertical_multiplier() {
        let noise = BlendedNoise::new(&mut LegacyRandom::from_seed(1), OVERWORLD)
            .expect("legacy banks have no positive octaves");
        let expected = MULTIPLIER * OVERWORLD.y_scale + 2.0;
        assert!((noise.max_value() - expected).abs() < 1e-6);
    }
}
