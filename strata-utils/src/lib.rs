//! Deterministic world generation primitives.
//!
//! Seeded random sources, noise, the density function graph, surface rule
//! structures and climate based biome lookup. Everything here reproduces
//! vanilla's numbers bit for bit for a given seed.

pub mod climate;
pub mod density;
pub mod identifier;
pub mod math;
pub mod noise;
pub mod random;
pub mod surface_rule;

pub use identifier::Identifier;
