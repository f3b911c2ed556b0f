//! The fifteen named density functions a noise generator samples.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

use crate::density::bake::DensityBaker;
use crate::density::error::{BakeError, DecodeError};
use crate::density::types::DensityFunction;

const CONTEXT: &str = "noise router";

/// Older key for `preliminary_surface_level`.
const PRELIMINARY_SURFACE_LEVEL_ALIAS: &str = "initial_density_without_jaggedness";

/// Noise router, matching vanilla's `NoiseRouter`.
#[derive(Debug, Clone)]
pub struct NoiseRouter {
    /// Aquifer barrier noise.
    pub barrier: DensityFunction,
    /// Aquifer floodedness.
    pub fluid_level_floodedness: DensityFunction,
    /// Aquifer spread.
    pub fluid_level_spread: DensityFunction,
    /// Aquifer lava selector.
    pub lava: DensityFunction,
    /// Climate: temperature.
    pub temperature: DensityFunction,
    /// Climate: humidity.
    pub vegetation: DensityFunction,
    /// Climate: continentalness.
    pub continents: DensityFunction,
    /// Climate: erosion.
    pub erosion: DensityFunction,
    /// Climate: depth.
    pub depth: DensityFunction,
    /// Climate: weirdness.
    pub ridges: DensityFunction,
    /// Surface height estimate; constant `0` when absent.
    pub preliminary_surface_level: DensityFunction,
    /// Terrain density.
    pub final_density: DensityFunction,
    /// Ore vein toggle.
    pub vein_toggle: DensityFunction,
    /// Ore vein ridges.
    pub vein_ridged: DensityFunction,
    /// Ore vein gaps.
    pub vein_gap: DensityFunction,
}

impl NoiseRouter {
    /// Every entry paired with its JSON key, in declaration order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, &DensityFunction); 15] {
        [
            ("barrier", &self.barrier),
            ("fluid_level_floodedness", &self.fluid_level_floodedness),
            ("fluid_level_spread", &self.fluid_level_spread),
            ("lava", &self.lava),
            ("temperature", &self.temperature),
            ("vegetation", &self.vegetation),
            ("continents", &self.continents),
            ("erosion", &self.erosion),
            ("depth", &self.depth),
            ("ridges", &self.ridges),
            ("preliminary_surface_level", &self.preliminary_surface_level),
            ("final_density", &self.final_density),
            ("vein_toggle", &self.vein_toggle),
            ("vein_ridged", &self.vein_ridged),
            ("vein_gap", &self.vein_gap),
        ]
    }

    /// Apply `f` to every entry.
    pub fn try_map<E>(
        &self,
        mut f: impl FnMut(&DensityFunction) -> Result<DensityFunction, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            barrier: f(&self.barrier)?,
            fluid_level_floodedness: f(&self.fluid_level_floodedness)?,
            fluid_level_spread: f(&self.fluid_level_spread)?,
            lava: f(&self.lava)?,
            temperature: f(&self.temperature)?,
            vegetation: f(&self.vegetation)?,
            continents: f(&self.continents)?,
            erosion: f(&self.erosion)?,
            depth: f(&self.depth)?,
            ridges: f(&self.ridges)?,
            preliminary_surface_level: f(&self.preliminary_surface_level)?,
            final_density: f(&self.final_density)?,
            vein_toggle: f(&self.vein_toggle)?,
            vein_ridged: f(&self.vein_ridged)?,
            vein_gap: f(&self.vein_gap)?,
        })
    }

    /// Bake every entry.
    pub fn bake<B: DensityBaker + ?Sized>(&self, baker: &mut B) -> Result<Self, BakeError> {
        self.try_map(|df| df.bake(baker))
    }

    /// Report the first unbaked placeholder among the entries.
    pub fn validate_baked(&self) -> Result<(), BakeError> {
        self.entries()
            .iter()
            .try_for_each(|(_, df)| df.validate_baked())
    }

    /// Decode from a `noise_router` object.
    ///
    /// # Errors
    /// Any entry's [`DecodeError`], or `MalformedStructure` when `value` is not
    /// an object or a required entry is missing.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let map = value
            .as_object()
            .ok_or_else(|| DecodeError::malformed(CONTEXT, "expected an object"))?;
        let entry = |key: &'static str| {
            let value = map.get(key).ok_or_else(|| {
                DecodeError::malformed(CONTEXT, format!("missing entry `{key}`"))
            })?;
            DensityFunction::decode(value)
        };

        let preliminary_surface_level = match map
            .get("preliminary_surface_level")
            .or_else(|| map.get(PRELIMINARY_SURFACE_LEVEL_ALIAS))
        {
            Some(value) => DensityFunction::decode(value)?,
            None => DensityFunction::constant(0.0),
        };

        Ok(Self {
            barrier: entry("barrier")?,
            fluid_level_floodedness: entry("fluid_level_floodedness")?,
            fluid_level_spread: entry("fluid_level_spread")?,
            lava: entry("lava")?,
            temperature: entry("temperature")?,
            vegetation: entry("vegetation")?,
            continents: entry("continents")?,
            erosion: entry("erosion")?,
            depth: entry("depth")?,
            ridges: entry("ridges")?,
            preliminary_surface_level,
            final_density: entry("final_density")?,
            vein_toggle: entry("vein_toggle")?,
            vein_ridged: entry("vein_ridged")?,
            vein_gap: entry("vein_gap")?,
        })
    }

    /// Encode to a `noise_router` object.
    #[must_use]
    pub fn encode(&self) -> Value {
        let map: Map<String, Value> = self
            .entries()
            .iter()
            .map(|(key, df)| ((*key).to_owned(), df.encode()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for NoiseRouter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NoiseRouter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(de::Error::custom)
    }
}
