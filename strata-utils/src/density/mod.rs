//! Density function graph for world generation.
//!
//! Trees are decoded from datapack JSON, baked once per seed against a registry
//! of named functions and noises, then sampled per block position.
//!
//! # Key Types
//!
//! - [`DensityFunction`] - The node enum with all operation types
//! - [`DensityBaker`] - Supplies baked targets and samplers during [`DensityFunction::bake`]
//! - [`NoiseRouter`] - The fifteen named functions a generator samples
//! - [`FunctionContext`] - The block position a function is sampled at

mod bake;
mod codec;
mod end_islands;
mod error;
mod router;
mod sample;
pub mod spline_eval;
mod types;

pub use bake::DensityBaker;
pub use end_islands::EndIslands;
pub use error::{BakeError, DecodeError};
pub use router::NoiseRouter;
pub use sample::FunctionContext;
pub use types::{
    BlendDensity, Clamp, Constant, CubicSpline, DensityFunction, EndIslandsDensity,
    FindTopSurface, Mapped, MappedType, Marker, MarkerType, Noise, NoiseHolder, OldBlendedNoise,
    RangeChoice, RarityValueMapper, Reference, Shift, ShiftA, ShiftB, ShiftedNoise, Spline,
    SplinePoint, SplineValue, TwoArgType, TwoArgumentSimple, WeirdScaledSampler, YClampedGradient,
};
