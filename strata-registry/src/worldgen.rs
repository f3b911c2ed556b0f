//! The registries a world generator is baked from.

use serde::Deserialize;
use serde_json::Value;
use strata_utils::Identifier;
use strata_utils::density::{DecodeError, DensityFunction};
use strata_utils::noise::NoiseParameters;
use tracing::debug;

use crate::multi_noise::{BiomeEntry, decode_biome_entries};
use crate::{Registry, RegistryError};

/// Density functions, noise definitions and biome parameter lists by key.
#[derive(Debug, Clone, Default)]
pub struct WorldgenRegistries {
    /// Named density function roots (unbaked).
    pub density_functions: Registry<DensityFunction>,
    /// Noise definitions.
    pub noises: Registry<NoiseParameters>,
    /// Multi-noise biome parameter presets.
    pub multi_noise_presets: Registry<Vec<BiomeEntry>>,
}

impl WorldgenRegistries {
    /// Decode and register every `key: tree` pair of a JSON object.
    ///
    /// # Errors
    /// The first decode failure or duplicate key.
    pub fn register_density_functions(&mut self, entries: &Value) -> Result<(), RegistryError> {
        register_all(&mut self.density_functions, entries, DensityFunction::decode)?;
        debug!(count = self.density_functions.len(), "density function registry filled");
        Ok(())
    }

    /// Decode and register every `key: {firstOctave, amplitudes}` pair.
    ///
    /// # Errors
    /// The first decode failure or duplicate key.
    pub fn register_noises(&mut self, entries: &Value) -> Result<(), RegistryError> {
        register_all(&mut self.noises, entries, |value| {
            NoiseParameters::deserialize(value).map_err(|e| DecodeError::MalformedStructure {
                context: "noise parameters",
                reason: e.to_string(),
            })
        })?;
        debug!(count = self.noises.len(), "noise registry filled");
        Ok(())
    }

    /// Decode and register every `preset: [{biome, parameters}]` pair.
    ///
    /// # Errors
    /// The first decode failure or duplicate key.
    pub fn register_multi_noise_presets(&mut self, entries: &Value) -> Result<(), RegistryError> {
        register_all(&mut self.multi_noise_presets, entries, decode_biome_entries)
    }

    /// Fill in entries from `lower` missing here. Existing entries win.
    pub fn merge_down(&mut self, lower: Self) {
        self.density_functions.merge_down(lower.density_functions);
        self.noises.merge_down(lower.noises);
        self.multi_noise_presets.merge_down(lower.multi_noise_presets);
    }
}

fn register_all<T>(
    registry: &mut Registry<T>,
    entries: &Value,
    decode: impl Fn(&Value) -> Result<T, DecodeError>,
) -> Result<(), RegistryError> {
    let map = entries.as_object().ok_or(RegistryError::NotAnObject)?;
    for (raw_key, value) in map {
        let key: Identifier = raw_key.parse()?;
        let decoded = decode(value).map_err(|source| RegistryError::Decode {
            key: key.clone(),
            source,
        })?;
        registry.register(key, decoded)?;
    }
    Ok(())
}
