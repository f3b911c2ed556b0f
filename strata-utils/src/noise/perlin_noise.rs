//! Octave stack over [`ImprovedNoise`], matching vanilla's `PerlinNoise`.

use crate::math::lfloor;
use crate::noise::{ImprovedNoise, NoiseError, OctaveInit};
use crate::random::{PositionalRandom, Random};

/// Coordinates are wrapped at `2^25` to keep precision far from the origin.
const ROUND_OFF: f64 = 33_554_432.0;

/// Draws consumed by one [`ImprovedNoise`] construction.
const OCTAVE_DRAWS: u32 = 262;

/// Multi-octave gradient noise.
///
/// Octave `i` (lowest frequency first) is sampled at `input_factor * 2^i` and
/// weighted by `amplitudes[i] * value_factor / 2^i`.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    noise_levels: Vec<Option<ImprovedNoise>>,
    amplitudes: Vec<f64>,
    first_octave: i32,
    lowest_freq_input_factor: f64,
    lowest_freq_value_factor: f64,
    max_value: f64,
}

impl PerlinNoise {
    /// Build an octave stack from a sequential generator.
    ///
    /// [`OctaveInit::Modern`] draws two longs (one positional fork) regardless of
    /// the amplitude count. [`OctaveInit::Legacy`] walks from the zero octave
    /// downward and fails with [`NoiseError::PositiveOctave`] when the stack
    /// reaches above octave zero.
    pub fn create<R: Random>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
        init: OctaveInit,
    ) -> Result<Self, NoiseError> {
        match init {
            OctaveInit::Modern => Ok(Self::create_modern(random, first_octave, amplitudes)),
            OctaveInit::Legacy => {
                let noise_levels = Self::legacy_levels(random, first_octave, amplitudes)?;
                Ok(Self::from_parts(noise_levels, first_octave, amplitudes))
            }
        }
    }

    /// [`OctaveInit::Modern`] construction, which accepts any octave range.
    pub fn create_modern<R: Random>(random: &mut R, first_octave: i32, amplitudes: &[f64]) -> Self {
        let noise_levels = Self::modern_levels(random, first_octave, amplitudes);
        Self::from_parts(noise_levels, first_octave, amplitudes)
    }

    fn modern_levels<R: Random>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Vec<Option<ImprovedNoise>> {
        let splitter = random.next_positional();
        amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| {
                (amplitude != 0.0).then(|| {
                    let octave = first_octave + i as i32;
                    ImprovedNoise::new(&mut splitter.with_hash_of(&format!("octave_{octave}")))
                })
            })
            .collect()
    }

    fn legacy_levels<R: Random>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Result<Vec<Option<ImprovedNoise>>, NoiseError> {
        let len = amplitudes.len() as i32;
        let zero_index = -first_octave;
        if zero_index < len - 1 {
            return Err(NoiseError::PositiveOctave);
        }

        let mut levels = vec![None; amplitudes.len()];

        // The zero octave is always drawn, even when it is outside the stack.
        let zero = ImprovedNoise::new(random);
        if (0..len).contains(&zero_index) && amplitudes[zero_index as usize] != 0.0 {
            levels[zero_index as usize] = Some(zero);
        }

        for index in (0..zero_index).rev() {
            match amplitudes.get(index as usize) {
                Some(&amplitude) if amplitude != 0.0 => {
                    levels[index as usize] = Some(ImprovedNoise::new(random));
                }
                _ => random.consume_count(OCTAVE_DRAWS),
            }
        }

        Ok(levels)
    }

    fn from_parts(
        noise_levels: Vec<Option<ImprovedNoise>>,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let octaves = amplitudes.len() as i32;
        let lowest_freq_input_factor = 2.0_f64.powi(first_octave);
        let lowest_freq_value_factor = 2.0_f64.powi(octaves - 1) / (2.0_f64.powi(octaves) - 1.0);

        let mut noise = Self {
            noise_levels,
            amplitudes: amplitudes.to_vec(),
            first_octave,
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value: 0.0,
        };
        noise.max_value = noise.edge_value(2.0);
        noise
    }

    /// Sample at `(x, y, z)`.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.get_value_with_y_params(x, y, z, 0.0, 0.0, false)
    }

    /// Sample with the vertical fudge parameters forwarded to every octave.
    ///
    /// With `use_fixed_y` each octave samples at `y = -yo`, which pins it to its
    /// own lattice plane.
    #[must_use]
    pub fn get_value_with_y_params(
        &self,
        x: f64,
        y: f64,
        z: f64,
        y_scale: f64,
        y_max: f64,
        use_fixed_y: bool,
    ) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;

        for (noise, &amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if let Some(noise) = noise {
                let sample = noise.noise_with_y_scale(
                    wrap(x * input_factor),
                    if use_fixed_y {
                        -noise.yo
                    } else {
                        wrap(y * input_factor)
                    },
                    wrap(z * input_factor),
                    y_scale * input_factor,
                    y_max * input_factor,
                );
                value += amplitude * sample * value_factor;
            }
            input_factor *= 2.0;
            value_factor /= 2.0;
        }

        value
    }

    /// Sum of `amplitude * noise_value * value_factor` over present octaves.
    #[must_use]
    pub fn edge_value(&self, noise_value: f64) -> f64 {
        let mut value = 0.0;
        let mut value_factor = self.lowest_freq_value_factor;
        for (noise, &amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if noise.is_some() {
                value += amplitude * noise_value * value_factor;
            }
            value_factor /= 2.0;
        }
        value
    }

    /// Upper bound used by [`BlendedNoise`](crate::noise::BlendedNoise):
    /// `edge_value(y_multiplier + 2)`.
    #[must_use]
    pub fn max_broken_value(&self, y_multiplier: f64) -> f64 {
        self.edge_value(y_multiplier + 2.0)
    }

    /// Theoretical maximum of [`get_value`](Self::get_value).
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Octave by index from the highest frequency (`0` is the last level).
    #[must_use]
    pub fn octave_noise(&self, i: usize) -> Option<&ImprovedNoise> {
        let index = self.noise_levels.len().checked_sub(1 + i)?;
        self.noise_levels[index].as_ref()
    }

    /// Exponent of the lowest-frequency octave.
    #[must_use]
    pub const fn first_octave(&self) -> i32 {
        self.first_octave
    }

    /// Per-octave amplitudes, lowest frequency first.
    #[must_use]
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }
}

/// Wrap a coordinate into `[-2^24, 2^24)`.
#[inline]
#[must_use]
pub fn wrap(x: f64) -> f64 {
    x - lfloor(x / ROUND_OFF + 0.5) as f64 * ROUND_OFF
}
