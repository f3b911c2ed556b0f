use strata_registry::RegistryError;
use strata_utils::Identifier;
use strata_utils::climate::ClimateError;
use strata_utils::density::{BakeError, DecodeError};
use strata_utils::noise::NoiseError;
use thiserror::Error;

/// Failure while assembling seed-dependent worldgen state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldgenError {
    /// Settings or registry contents failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The baking pass failed.
    #[error(transparent)]
    Bake(#[from] BakeError),
    /// A registry rejected an entry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A biome parameter list could not be built.
    #[error(transparent)]
    Climate(#[from] ClimateError),
    /// A noise sampler could not be built.
    #[error(transparent)]
    Noise(#[from] NoiseError),
    /// No multi-noise preset is registered under this key.
    #[error("no multi-noise preset `{0}`")]
    MissingPreset(Identifier),
}
