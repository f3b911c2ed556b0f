//! Noise primitives built on the seeded generators in [`crate::random`].
//!
//! - [`ImprovedNoise`] - single-octave 3D gradient noise
//! - [`PerlinNoise`] - octave stack over [`ImprovedNoise`]
//! - [`NormalNoise`] - two octave stacks sampled at a fixed relative offset
//! - [`SimplexNoise`] - 2D/3D simplex noise (End islands)
//! - [`BlendedNoise`] - legacy interpolated terrain noise (`old_blended_noise`)

mod blended_noise;
mod improved_noise;
mod normal_noise;
mod perlin_noise;
mod simplex_noise;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use blended_noise::{BlendedNoise, BlendedNoiseParams};
pub use improved_noise::ImprovedNoise;
pub use normal_noise::{INPUT_FACTOR, NormalNoise};
pub use perlin_noise::PerlinNoise;
pub use simplex_noise::SimplexNoise;

/// Gradient vectors shared between Perlin and simplex noise (vanilla `SimplexNoise.GRADIENT`).
pub(crate) const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// How an octave stack draws its per-octave generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OctaveInit {
    /// Fork a positional splitter once, then seed octave `n` from
    /// `with_hash_of("octave_{n}")`.
    #[default]
    Modern,
    /// Draw octaves sequentially from the parent generator, starting at the zero
    /// octave and walking down, skipping 262 draws for each zero amplitude.
    Legacy,
}

/// Errors raised while constructing noise samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoiseError {
    /// Legacy octave initialization cannot produce octaves above zero.
    #[error("positive octaves are not allowed with legacy octave initialization")]
    PositiveOctave,
}

/// Declarative noise definition: `{"firstOctave": int, "amplitudes": [number...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    /// Exponent of the lowest-frequency octave (usually negative).
    #[serde(rename = "firstOctave")]
    pub first_octave: i32,
    /// Per-octave amplitudes, lowest frequency first.
    pub amplitudes: Vec<f64>,
}

impl NoiseParameters {
    /// Create new noise parameters.
    #[must_use]
    pub const fn new(first_octave: i32, amplitudes: Vec<f64>) -> Self {
        Self {
            first_octave,
            amplitudes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_parameters_use_camel_case_first_octave() {
        let params: NoiseParameters =
            serde_json::from_str(r#"{"firstOctave": -7, "amplitudes": [1, 0.5]}"#)
                .expect("valid parameters");
        assert_eq!(params, NoiseParameters::new(-7, vec![1.0, 0.5]));

        let json = serde_json::to_value(&params).expect("serializable");
        assert_eq!(json["firstOctave"], -7);
    }
}
