//! Double-sampled octave noise matching vanilla's `NormalNoise`.
//!
//! Two [`PerlinNoise`] stacks are drawn from the same generator in sequence; the
//! second is sampled at coordinates scaled by [`INPUT_FACTOR`] and the sum is
//! normalised by the span of non-zero amplitudes.

use crate::noise::{NoiseError, NoiseParameters, OctaveInit, PerlinNoise};
use crate::random::Random;

/// Scale applied to the second stack's coordinates (`337 / 331`).
#[expect(clippy::unreadable_literal, reason = "exact vanilla constant")]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

#[expect(clippy::unreadable_literal, reason = "exact vanilla constant")]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

/// Double Perlin noise.
#[derive(Debug, Clone)]
pub struct NormalNoise {
    parameters: NoiseParameters,
    first: PerlinNoise,
    second: PerlinNoise,
    value_factor: f64,
    max_value: f64,
}

impl NormalNoise {
    /// Build with modern octave initialization. Never fails.
    pub fn create<R: Random>(random: &mut R, parameters: &NoiseParameters) -> Self {
        let NoiseParameters {
            first_octave,
            amplitudes,
        } = parameters;
        let first = PerlinNoise::create_modern(random, *first_octave, amplitudes);
        let second = PerlinNoise::create_modern(random, *first_octave, amplitudes);
        Self::finish(parameters, first, second)
    }

    /// Build with legacy octave initialization, as vanilla does for the nether
    /// biome climate noises of legacy-random worlds.
    pub fn create_legacy_nether_biome<R: Random>(
        random: &mut R,
        parameters: &NoiseParameters,
    ) -> Result<Self, NoiseError> {
        Self::with_init(random, parameters, OctaveInit::Legacy)
    }

    /// Build with an explicit octave initialization.
    pub fn with_init<R: Random>(
        random: &mut R,
        parameters: &NoiseParameters,
        init: OctaveInit,
    ) -> Result<Self, NoiseError> {
        let NoiseParameters {
            first_octave,
            amplitudes,
        } = parameters;
        let first = PerlinNoise::create(random, *first_octave, amplitudes, init)?;
        let second = PerlinNoise::create(random, *first_octave, amplitudes, init)?;
        Ok(Self::finish(parameters, first, second))
    }

    fn finish(parameters: &NoiseParameters, first: PerlinNoise, second: PerlinNoise) -> Self {
        let mut min_index = i32::MAX;
        let mut max_index = i32::MIN;
        for (i, &amplitude) in parameters.amplitudes.iter().enumerate() {
            if amplitude != 0.0 {
                min_index = min_index.min(i as i32);
                max_index = max_index.max(i as i32);
            }
        }

        // An all-zero list wraps to a span of 1, as the JVM does.
        let value_factor = TARGET_DEVIATION / expected_deviation(max_index.wrapping_sub(min_index));
        let max_value = (first.max_value() + second.max_value()) * value_factor;

        Self {
            parameters: parameters.clone(),
            first,
            second,
            value_factor,
            max_value,
        }
    }

    /// Sample at `(x, y, z)`.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let x2 = x * INPUT_FACTOR;
        let y2 = y * INPUT_FACTOR;
        let z2 = z * INPUT_FACTOR;
        (self.first.get_value(x, y, z) + self.second.get_value(x2, y2, z2)) * self.value_factor
    }

    /// Normalisation applied to the summed stacks: `(5/3) * k / (k + 1)` where
    /// `k` counts octaves from the first to the last non-zero amplitude.
    #[inline]
    #[must_use]
    pub const fn value_factor(&self) -> f64 {
        self.value_factor
    }

    /// Theoretical maximum of [`get_value`](Self::get_value).
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// The definition this sampler was built from.
    #[must_use]
    pub const fn parameters(&self) -> &NoiseParameters {
        &self.parameters
    }
}

#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span.wrapping_add(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::legacy_random::LegacyRandom;
    use crate::random::xoroshiro::Xoroshiro;

    #[test]
    fn matches_reference_value() {
        let mut rng = Xoroshiro::from_seed(135_701_357_103_567);
        let params = NoiseParameters::new(-12, vec![1.0, 0.5, 0.0, 0.0, 0.0, 0.5]);
        let noise = NormalNoise::create(&mut rng, &params);
        let v = noise.get_value(67.0, 41.0, 32.0);
        assert!((v + 0.045_405_751_762_018_65).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn value_factor_follows_octave_span() {
        let cases: [(&[f64], f64); 4] = [
            (&[1.0], 1.0),
            (&[1.0, 1.0], 2.0),
            (&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0], 4.0),
            (&[1.0, 0.5, 0.0, 0.0, 0.0, 0.5], 6.0),
        ];
        for (amplitudes, k) in cases {
            let mut rng = Xoroshiro::from_seed(1);
            let noise =
                NormalNoise::create(&mut rng, &NoiseParameters::new(-4, amplitudes.to_vec()));
            let expected = 5.0 / 3.0 * k / (k + 1.0);
            assert!(
                (noise.value_factor() - expected).abs() < 1e-12,
                "{amplitudes:?}: {} != {expected}",
                noise.value_factor()
            );
        }
    }

    #[test]
    fn all_zero_amplitudes_are_defined() {
        let mut rng = Xoroshiro::from_seed(1);
        let noise = NormalNoise::create(&mut rng, &NoiseParameters::new(0, vec![0.0]));
        assert!(noise.value_factor().is_finite());
        assert!(noise.get_value(10.0, 20.0, 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_stacks_draw_in_sequence() {
        let params = NoiseParameters::new(-3, vec![1.0, 1.0, 1.0]);
        let noise = NormalNoise::create(&mut Xoroshiro::from_seed(12345), &params);
        let v1 = noise.get_value(1000.0, 0.0, 1000.0);
        let v2 = noise.get_value(1001.0, 0.0, 1000.0);
        assert!((v1 - v2).abs() > 1e-4);
    }

    #[test]
    fn legacy_nether_biome_rejects_positive_octaves() {
        let mut rng = LegacyRandom::from_seed(0);
        let params = NoiseParameters::new(-7, vec![1.0, 1.0]);
        assert!(NormalNoise::create_legacy_nether_biome(&mut rng, &params).is_ok());

        let params = NoiseParameters::new(0, vec![1.0, 1.0]);
        assert_eq!(
            NormalNoise::create_legacy_nether_biome(&mut rng, &params).err(),
            Some(NoiseError::PositiveOctave)
        );
    }
}
