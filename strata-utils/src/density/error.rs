use thiserror::Error;

use crate::identifier::{Identifier, InvalidIdentifier};
use crate::noise::NoiseError;

/// A generic tree could not be decoded into a typed structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Neither a valid shorthand nor a well-formed typed object.
    #[error("malformed {context}: {reason}")]
    MalformedStructure {
        /// What was being decoded.
        context: &'static str,
        /// Why it failed.
        reason: String,
    },
    /// A `"type"` discriminator names no known variant.
    #[error("unknown {kind} type `{name}`")]
    UnknownVariant {
        /// Family of the discriminator (density function, surface rule, ...).
        kind: &'static str,
        /// The unrecognised name.
        name: String,
    },
    /// A key string is not a valid identifier.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
}

impl DecodeError {
    pub(crate) fn malformed(context: &'static str, reason: impl ToString) -> Self {
        Self::MalformedStructure {
            context,
            reason: reason.to_string(),
        }
    }
}

/// Baking a density function tree failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BakeError {
    /// A reference names a key absent from the registry.
    #[error("density function `{0}` is not registered")]
    MissingReference(Identifier),
    /// A noise node names a key absent from the noise registry.
    #[error("noise `{0}` is not registered")]
    MissingNoise(Identifier),
    /// A reference was reached again while it was still being baked.
    #[error("density function `{0}` references itself")]
    CyclicReference(Identifier),
    /// A seed-dependent node was left without a sampler.
    #[error("`{0}` has no sampler; no seed was applied")]
    NoSeedSet(Identifier),
    /// A sampler could not be constructed.
    #[error(transparent)]
    Noise(#[from] NoiseError),
}
