//! # Strata Core
//!
//! Seed-dependent world generation state: the baking pass that turns decoded
//! registries into sample-ready trees, the noise router and climate sampler
//! built on top of it, and the biome sources that consume climate samples.

pub mod worldgen;
