//! Keyed registries for world generation data.
//!
//! Registries are filled once from decoded datapack JSON and then shared
//! read-only. Keys are [`Identifier`]s; iteration follows registration order.

mod multi_noise;
mod registry;
mod worldgen;

use strata_utils::Identifier;
use strata_utils::identifier::InvalidIdentifier;
use strata_utils::density::DecodeError;
use thiserror::Error;

pub use multi_noise::{BiomeEntry, decode_biome_entries};
pub use registry::Registry;
pub use worldgen::WorldgenRegistries;

/// Filling a registry failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A key was registered twice.
    #[error("`{0}` is already registered")]
    DuplicateKey(Identifier),
    /// Registry contents must be a JSON object of key to entry.
    #[error("registry contents must be an object")]
    NotAnObject,
    /// A registry key is not a valid identifier.
    #[error("invalid registry key")]
    InvalidKey(#[from] InvalidIdentifier),
    /// An entry's JSON could not be decoded.
    #[error("failed to decode `{key}`")]
    Decode {
        /// The entry's key.
        key: Identifier,
        /// What went wrong.
        #[source]
        source: DecodeError,
    },
}
