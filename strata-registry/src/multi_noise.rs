//! Multi-noise biome parameter lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_utils::Identifier;
use strata_utils::climate::ParameterPoint;
use strata_utils::density::DecodeError;

/// A biome and the climate hypercube it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeEntry {
    /// Biome key.
    pub biome: Identifier,
    /// Climate ranges; each is a number or a `[min, max]` pair.
    pub parameters: ParameterPoint,
}

impl BiomeEntry {
    /// The `(hypercube, biome)` pair a search tree is built from.
    #[must_use]
    pub fn into_pair(self) -> (ParameterPoint, Identifier) {
        (self.parameters, self.biome)
    }
}

/// Decode `[{biome, parameters: {...}}, ...]`.
///
/// # Errors
/// [`DecodeError::MalformedStructure`] when the list or an entry does not fit.
pub fn decode_biome_entries(value: &Value) -> Result<Vec<BiomeEntry>, DecodeError> {
    Vec::<BiomeEntry>::deserialize(value).map_err(|e| DecodeError::MalformedStructure {
        context: "multi-noise parameter list",
        reason: e.to_string(),
    })
}
