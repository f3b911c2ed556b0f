//! Biome source abstraction.
//!
//! Mirrors vanilla's `BiomeSource` hierarchy:
//! - `MultiNoiseBiomeSource` for climate parameter matching via the `RTree`
//! - `TheEndBiomeSource` for spatial and erosion thresholds
//!
//! Callers create one [`ChunkBiomeSampler`] per chunk (or per thread); it holds
//! the `RTree` warm-start index for consecutive lookups.

use std::sync::Arc;

use strata_registry::{BiomeEntry, WorldgenRegistries};
use strata_utils::Identifier;
use strata_utils::climate::{ClimateError, ParameterList};
use strata_utils::density::EndIslands;

use super::{ClimateSampler, WorldgenError};

static THE_END: Identifier = Identifier::vanilla_static("the_end");
static END_HIGHLANDS: Identifier = Identifier::vanilla_static("end_highlands");
static END_MIDLANDS: Identifier = Identifier::vanilla_static("end_midlands");
static SMALL_END_ISLANDS: Identifier = Identifier::vanilla_static("small_end_islands");
static END_BARRENS: Identifier = Identifier::vanilla_static("end_barrens");

/// Dimension-specific biome source.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum BiomeSourceKind {
    /// Climate matching against a biome parameter list.
    MultiNoise(MultiNoiseBiomeSource),
    /// Spatial distance plus erosion threshold.
    End(EndBiomeSource),
}

impl BiomeSourceKind {
    /// Create a per-chunk biome sampler reading climate from `climate`.
    #[must_use]
    pub const fn chunk_sampler<'a>(&'a self, climate: &'a ClimateSampler) -> ChunkBiomeSampler<'a> {
        match self {
            Self::MultiNoise(source) => ChunkBiomeSampler::MultiNoise(MultiNoiseChunkBiomeSampler {
                source,
                climate,
                hint: None,
            }),
            Self::End(source) => ChunkBiomeSampler::End(EndChunkBiomeSampler { source }),
        }
    }
}

/// Per-chunk biome sampler.
///
/// Uses enum dispatch instead of `dyn` on the per-quart sampling path.
#[derive(Debug)]
pub enum ChunkBiomeSampler<'a> {
    /// Climate then `RTree` lookup.
    MultiNoise(MultiNoiseChunkBiomeSampler<'a>),
    /// Spatial distance thresholds.
    End(EndChunkBiomeSampler<'a>),
}

impl<'a> ChunkBiomeSampler<'a> {
    /// Get the biome at the given quart position.
    #[inline]
    pub fn sample(&mut self, quart_x: i32, quart_y: i32, quart_z: i32) -> &'a Identifier {
        match self {
            Self::MultiNoise(s) => s.sample(quart_x, quart_y, quart_z),
            Self::End(s) => s.sample(quart_x, quart_y, quart_z),
        }
    }
}

/// Multi-noise biome source.
///
/// Equivalent to vanilla's `MultiNoiseBiomeSource` with a direct parameter list.
#[derive(Debug, Clone)]
pub struct MultiNoiseBiomeSource {
    parameters: ParameterList<Identifier>,
}

impl MultiNoiseBiomeSource {
    /// Build the search tree over `entries`.
    ///
    /// # Errors
    /// `ClimateError::EmptyTree` when `entries` is empty.
    pub fn new(entries: Vec<BiomeEntry>) -> Result<Self, ClimateError> {
        let values = entries.into_iter().map(BiomeEntry::into_pair).collect();
        Ok(Self {
            parameters: ParameterList::new(values)?,
        })
    }

    /// Build from the preset registered under `key`.
    pub fn from_preset(
        registries: &WorldgenRegistries,
        key: &Identifier,
    ) -> Result<Self, WorldgenError> {
        let entries = registries
            .multi_noise_presets
            .get(key)
            .ok_or_else(|| WorldgenError::MissingPreset(key.clone()))?;
        Ok(Self::new(entries.clone())?)
    }

    /// The parameter list searched by this source.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterList<Identifier> {
        &self.parameters
    }

    /// Biome at a quart position, warm-starting the search from `hint`.
    pub fn get_noise_biome(
        &self,
        quart_x: i32,
        quart_y: i32,
        quart_z: i32,
        climate: &ClimateSampler,
        hint: &mut Option<usize>,
    ) -> &Identifier {
        let target = climate.sample(quart_x, quart_y, quart_z);
        self.parameters.find_value(&target, hint)
    }
}

/// Per-chunk sampler for [`MultiNoiseBiomeSource`].
#[derive(Debug)]
pub struct MultiNoiseChunkBiomeSampler<'a> {
    source: &'a MultiNoiseBiomeSource,
    climate: &'a ClimateSampler,
    hint: Option<usize>,
}

impl<'a> MultiNoiseChunkBiomeSampler<'a> {
    fn sample(&mut self, quart_x: i32, quart_y: i32, quart_z: i32) -> &'a Identifier {
        self.source
            .get_noise_biome(quart_x, quart_y, quart_z, self.climate, &mut self.hint)
    }
}

/// Biome source for The End dimension.
///
/// Does not use climate parameters. Biome choice is based on:
///
/// 1. **Central island** (`chunkX² + chunkZ² ≤ 4096`): always `the_end`
/// 2. **Outer islands** (erosion from `EndIslands` at transformed coordinates):
///    - `> 0.25` → `end_highlands`
///    - `≥ -0.0625` → `end_midlands`
///    - `< -0.21875` → `small_end_islands`
///    - otherwise → `end_barrens`
///
/// Matches vanilla's `TheEndBiomeSource`.
#[derive(Debug, Clone)]
pub struct EndBiomeSource {
    end_islands: Arc<EndIslands>,
}

impl EndBiomeSource {
    /// Create an End biome source for the given world seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_islands(Arc::new(EndIslands::new(seed)))
    }

    /// Share an island sampler that was already built for this seed.
    #[must_use]
    pub const fn with_islands(end_islands: Arc<EndIslands>) -> Self {
        Self { end_islands }
    }

    /// Biome at a quart position.
    #[must_use]
    pub fn get_noise_biome(&self, quart_x: i32, quart_z: i32) -> &'static Identifier {
        let chunk_x = (quart_x << 2) >> 4;
        let chunk_z = (quart_z << 2) >> 4;

        if i64::from(chunk_x) * i64::from(chunk_x) + i64::from(chunk_z) * i64::from(chunk_z) <= 4096
        {
            return &THE_END;
        }

        let weird_block_x = (chunk_x * 2 + 1) * 8;
        let weird_block_z = (chunk_z * 2 + 1) * 8;
        let erosion = self.end_islands.sample(weird_block_x, weird_block_z);

        if erosion > 0.25 {
            &END_HIGHLANDS
        } else if erosion >= -0.0625 {
            &END_MIDLANDS
        } else if erosion < -0.21875 {
            &SMALL_END_ISLANDS
        } else {
            &END_BARRENS
        }
    }
}

/// Per-chunk sampler for [`EndBiomeSource`].
#[derive(Debug)]
pub struct EndChunkBiomeSampler<'a> {
    source: &'a EndBiomeSource,
}

impl EndChunkBiomeSampler<'_> {
    fn sample(&mut self, quart_x: i32, _quart_y: i32, quart_z: i32) -> &'static Identifier {
        self.source.get_noise_biome(quart_x, quart_z)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strata_utils::climate::{Parameter, ParameterPoint};
    use strata_utils::density::NoiseRouter;

    use super::*;

    fn entry(biome: &'static str, temperature: Parameter) -> BiomeEntry {
        let full = Parameter::span(-1.0, 1.0);
        BiomeEntry {
            biome: Identifier::vanilla_static(biome),
            parameters: ParameterPoint::new(temperature, full, full, full, full, full, 0),
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        assert_eq!(
            MultiNoiseBiomeSource::new(Vec::new()).map(|_| ()),
            Err(ClimateError::EmptyTree)
        );
    }

    #[test]
    fn missing_preset() {
        let registries = WorldgenRegistries::default();
        let key = Identifier::vanilla_static("overworld");
        assert_eq!(
            MultiNoiseBiomeSource::from_preset(&registries, &key).map(|_| ()),
            Err(WorldgenError::MissingPreset(key))
        );
    }

    #[test]
    fn source_keeps_entry_order() {
        let source = MultiNoiseBiomeSource::new(vec![
            entry("cold", Parameter::span(-1.0, 0.0)),
            entry("warm", Parameter::span(0.0, 1.0)),
        ])
        .expect("non-empty");
        let biomes: Vec<_> = source
            .parameters()
            .values()
            .iter()
            .map(|(_, biome)| biome.path.as_ref())
            .collect();
        assert_eq!(biomes, ["cold", "warm"]);
    }

    #[test]
    fn end_central_island() {
        let source = EndBiomeSource::new(0);
        assert_eq!(source.get_noise_biome(0, 0), &THE_END);
        // Chunk 64 is the last chunk on the axis inside the central island.
        assert_eq!(source.get_noise_biome(64 * 4, 0), &THE_END);
        assert_ne!(source.get_noise_biome(65 * 4, 0), &THE_END);
    }

    #[test]
    fn end_outer_biomes_are_end_biomes() {
        let kind = BiomeSourceKind::End(EndBiomeSource::new(42));
        let outer = [&END_HIGHLANDS, &END_MIDLANDS, &SMALL_END_ISLANDS, &END_BARRENS];
        let climate = ClimateSampler::new(&unit_router());
        let mut sampler = kind.chunk_sampler(&climate);
        for quart in (400..800).step_by(37) {
            let biome = sampler.sample(quart, 0, -quart);
            assert!(outer.contains(&biome), "{biome}");
        }
    }

    fn unit_router() -> NoiseRouter {
        let mut value = json!({});
        for key in [
            "barrier",
            "fluid_level_floodedness",
            "fluid_level_spread",
            "lava",
            "temperature",
            "vegetation",
            "continents",
            "erosion",
            "depth",
            "ridges",
            "final_density",
            "vein_toggle",
            "vein_ridged",
            "vein_gap",
        ] {
            value[key] = json!(0.0);
        }
        NoiseRouter::decode(&value).expect("decodable")
    }

    #[test]
    fn multi_noise_sampler_follows_climate() {
        let kind = BiomeSourceKind::MultiNoise(
            MultiNoiseBiomeSource::new(vec![
                entry("cold", Parameter::span(-1.0, -0.1)),
                entry("warm", Parameter::span(0.5, 1.0)),
            ])
            .expect("non-empty"),
        );
        // Temperature 0 is 0.1 from cold and 0.5 from warm.
        let climate = ClimateSampler::new(&unit_router());
        let mut sampler = kind.chunk_sampler(&climate);
        assert_eq!(sampler.sample(0, 0, 0).path, "cold");
    }
}
