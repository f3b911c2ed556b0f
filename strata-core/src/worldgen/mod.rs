//! World generation module.
//!
//! This module wires the decoded worldgen registries to a world seed and
//! exposes the baked state to biome and terrain sampling.

mod bake;
mod biome_source;
mod climate_sampler;
mod error;
mod random_state;
mod settings;

pub use bake::{BakeCoordinator, BakeLedger, BakedRegistries, bake_all};
pub use biome_source::{
    BiomeSourceKind, ChunkBiomeSampler, EndBiomeSource, EndChunkBiomeSampler,
    MultiNoiseBiomeSource, MultiNoiseChunkBiomeSampler,
};
pub use climate_sampler::ClimateSampler;
pub use error::WorldgenError;
pub use random_state::RandomState;
pub use settings::NoiseSettings;
