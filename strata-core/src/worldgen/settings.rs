//! Noise generator settings.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use strata_utils::density::{DecodeError, NoiseRouter};
use strata_utils::random::RandomKind;
use strata_utils::surface_rule::SurfaceRule;

const CONTEXT: &str = "noise settings";

/// The parts of a `noise_settings` file that seed-dependent state is built from.
#[derive(Debug, Clone)]
pub struct NoiseSettings {
    /// Use the 48-bit LCG instead of xoroshiro.
    pub legacy_random_source: bool,
    /// Router entries, unbaked.
    pub noise_router: NoiseRouter,
    /// Surface rule tree; decoded but not evaluated here.
    pub surface_rule: Option<SurfaceRule>,
}

impl NoiseSettings {
    /// Settings around `noise_router` with the modern random source.
    #[must_use]
    pub const fn new(noise_router: NoiseRouter) -> Self {
        Self {
            legacy_random_source: false,
            noise_router,
            surface_rule: None,
        }
    }

    /// The generator family selected by `legacy_random_source`.
    #[must_use]
    pub const fn random_kind(&self) -> RandomKind {
        if self.legacy_random_source {
            RandomKind::Legacy
        } else {
            RandomKind::Xoroshiro
        }
    }

    /// Decode from a noise settings object. Unknown keys are ignored.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let map = value.as_object().ok_or_else(|| malformed("expected an object"))?;

        let legacy_random_source = match map.get("legacy_random_source") {
            None => false,
            Some(Value::Bool(legacy)) => *legacy,
            Some(_) => return Err(malformed("`legacy_random_source` must be a boolean")),
        };
        let noise_router = map
            .get("noise_router")
            .ok_or_else(|| malformed("missing `noise_router`"))
            .and_then(NoiseRouter::decode)?;
        let surface_rule = map
            .get("surface_rule")
            .map(SurfaceRule::decode)
            .transpose()?;

        Ok(Self {
            legacy_random_source,
            noise_router,
            surface_rule,
        })
    }
}

fn malformed(reason: &str) -> DecodeError {
    DecodeError::MalformedStructure {
        context: CONTEXT,
        reason: reason.to_owned(),
    }
}

impl<'de> Deserialize<'de> for NoiseSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings_json() -> Value {
        let mut router = serde_json::Map::new();
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
            router.insert(key.to_owned(), json!(0.0));
        }
        json!({
            "sea_level": 63,
            "noise_router": router,
            "surface_rule": {"type": "minecraft:block", "result_state": {"Name": "minecraft:stone"}}
        })
    }

    #[test]
    fn defaults_to_modern_random() {
        let settings = NoiseSettings::decode(&settings_json()).expect("decodable");
        assert!(!settings.legacy_random_source);
        assert_eq!(settings.random_kind(), RandomKind::Xoroshiro);
        assert!(settings.surface_rule.is_some());
    }

    #[test]
    fn legacy_flag() {
        let mut value = settings_json();
        value["legacy_random_source"] = json!(true);
        let settings: NoiseSettings = serde_json::from_value(value).expect("decodable");
        assert_eq!(settings.random_kind(), RandomKind::Legacy);
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut value = settings_json();
        value["legacy_random_source"] = json!("yes");
        assert!(matches!(
            NoiseSettings::decode(&value),
            Err(DecodeError::MalformedStructure { .. })
        ));

        let mut value = settings_json();
        if let Some(map) = value.as_object_mut() {
            map.remove("noise_router");
        }
        assert!(NoiseSettings::decode(&value).is_err());
        assert!(NoiseSettings::decode(&json!([])).is_err());
    }
}
