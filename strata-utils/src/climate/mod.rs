//! Climate parameter space and nearest-biome lookup.
//!
//! Climate parameters (temperature, humidity, etc.) are quantized to long integers
//! and used to find the best matching biome from a parameter space.
//!
//! # Key Types
//!
//! - [`TargetPoint`] - A sampled climate point with 6 quantized parameters
//! - [`Parameter`] - A parameter range (min/max) for biome matching
//! - [`ParameterPoint`] - A biome's full climate hypercube
//! - [`ParameterList`] - Biomes with their parameter points, indexed by an R-tree

mod rtree;
mod types;

use thiserror::Error;

pub use rtree::ParameterList;
pub use types::{Parameter, ParameterPoint, TargetPoint};

/// Quantization factor used to convert floats to longs.
pub const QUANTIZATION_FACTOR: f32 = 10000.0;

/// Number of search axes: six climate parameters plus the offset.
pub const PARAMETER_COUNT: usize = 7;

/// A biome index could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClimateError {
    /// No entries were given.
    #[error("cannot build a biome search tree from zero entries")]
    EmptyTree,
}

/// Quantize a coordinate: `(long)((float) coord * 10000f)`.
///
/// The input is narrowed to `f32` before the multiply.
#[inline]
#[must_use]
pub fn quantize_coord(coord: f64) -> i64 {
    ((coord as f32) * QUANTIZATION_FACTOR) as i64
}

/// Unquantize: `(float) coord / 10000f`.
#[inline]
#[must_use]
pub fn unquantize_coord(coord: i64) -> f32 {
    coord as f32 / QUANTIZATION_FACTOR
}
