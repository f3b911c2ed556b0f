//! Seeded pseudo-random generators matching vanilla Minecraft's `RandomSource` family.
//!
//! Two interchangeable generators are provided:
//!
//! - [`LegacyRandom`](legacy_random::LegacyRandom) - the 48-bit linear congruential generator
//!   (`java.util.Random` semantics)
//! - [`Xoroshiro`](xoroshiro::Xoroshiro) - the 128-bit xoroshiro128++ generator
//!
//! Both can be *split* into a [`RandomSplitter`], which derives fresh, independent
//! generators keyed by a block position, a string, or a raw seed without consuming
//! the splitter itself.

pub mod legacy_random;
pub mod xoroshiro;

use legacy_random::{LegacyRandom, LegacySplitter};
use xoroshiro::{Xoroshiro, XoroshiroSplitter};

/// A sequential random number generator.
///
/// Every draw advances internal state, so callers that need reproducible output must
/// draw in a fixed order.
pub trait Random {
    /// Next uniformly distributed `i32`.
    fn next_i32(&mut self) -> i32;

    /// Next `i32` in `[0, bound)` without modulo bias.
    ///
    /// `bound` must be positive.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;

    /// Next uniformly distributed `i64`.
    fn next_i64(&mut self) -> i64;

    /// Next boolean.
    fn next_bool(&mut self) -> bool;

    /// Next `f32` in `[0, 1)` with 24 bits of precision.
    fn next_f32(&mut self) -> f32;

    /// Next `f64` in `[0, 1)` with 53 bits of precision.
    fn next_f64(&mut self) -> f64;

    /// Advance the generator as if `count` values had been drawn.
    fn consume_count(&mut self, count: u32);

    /// Split off an independent generator of the same kind, seeded from this one.
    #[must_use]
    fn fork(&mut self) -> Self
    where
        Self: Sized;

    /// Split off a positional splitter seeded from this generator.
    ///
    /// Consumes exactly two `i64` draws (xoroshiro) or one (legacy).
    fn next_positional(&mut self) -> RandomSplitter;

    /// Next `i32` in `[min, max]` (inclusive).
    fn next_i32_between_inclusive(&mut self, min: i32, max: i32) -> i32 {
        min + self.next_i32_bounded(max - min + 1)
    }
}

/// Derives fresh generators from fixed seed material.
///
/// Implementors never mutate their own state: deriving twice with the same key
/// yields identical generators.
pub trait PositionalRandom {
    /// Generator keyed by a block position.
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource;

    /// Generator keyed by a string (usually a namespaced identifier).
    fn with_hash_of(&self, name: &str) -> RandomSource;

    /// Generator keyed by a raw 64-bit seed.
    fn with_seed(&self, seed: i64) -> RandomSource;
}

/// Which generator family a world uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RandomKind {
    /// xoroshiro128++ (the modern default).
    #[default]
    Xoroshiro,
    /// 48-bit LCG (`legacy_random_source: true`).
    Legacy,
}

impl RandomKind {
    /// Create a sequential generator of this kind from a world seed.
    #[must_use]
    pub fn new_instance(self, seed: u64) -> RandomSource {
        match self {
            Self::Xoroshiro => RandomSource::Xoroshiro(Xoroshiro::from_seed(seed)),
            Self::Legacy => RandomSource::Legacy(LegacyRandom::from_seed(seed)),
        }
    }
}

/// A sequential generator of either family.
#[derive(Debug, Clone)]
pub enum RandomSource {
    /// xoroshiro128++ generator.
    Xoroshiro(Xoroshiro),
    /// 48-bit LCG generator.
    Legacy(LegacyRandom),
}

impl Random for RandomSource {
    #[inline]
    fn next_i32(&mut self) -> i32 {
        match self {
            Self::Xoroshiro(r) => r.next_i32(),
            Self::Legacy(r) => r.next_i32(),
        }
    }

    #[inline]
    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        match self {
            Self::Xoroshiro(r) => r.next_i32_bounded(bound),
            Self::Legacy(r) => r.next_i32_bounded(bound),
        }
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        match self {
            Self::Xoroshiro(r) => r.next_i64(),
            Self::Legacy(r) => r.next_i64(),
        }
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        match self {
            Self::Xoroshiro(r) => r.next_bool(),
            Self::Legacy(r) => r.next_bool(),
        }
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        match self {
            Self::Xoroshiro(r) => r.next_f32(),
            Self::Legacy(r) => r.next_f32(),
        }
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        match self {
            Self::Xoroshiro(r) => r.next_f64(),
            Self::Legacy(r) => r.next_f64(),
        }
    }

    fn consume_count(&mut self, count: u32) {
        match self {
            Self::Xoroshiro(r) => r.consume_count(count),
            Self::Legacy(r) => r.consume_count(count),
        }
    }

    fn fork(&mut self) -> Self {
        match self {
            Self::Xoroshiro(r) => Self::Xoroshiro(r.fork()),
            Self::Legacy(r) => Self::Legacy(r.fork()),
        }
    }

    fn next_positional(&mut self) -> RandomSplitter {
        match self {
            Self::Xoroshiro(r) => r.next_positional(),
            Self::Legacy(r) => r.next_positional(),
        }
    }
}

/// A positional splitter of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomSplitter {
    /// Splitter derived from a xoroshiro generator.
    Xoroshiro(XoroshiroSplitter),
    /// Splitter derived from a legacy LCG.
    Legacy(LegacySplitter),
}

impl PositionalRandom for RandomSplitter {
    #[inline]
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        match self {
            Self::Xoroshiro(s) => s.at(x, y, z),
            Self::Legacy(s) => s.at(x, y, z),
        }
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        match self {
            Self::Xoroshiro(s) => s.with_hash_of(name),
            Self::Legacy(s) => s.with_hash_of(name),
        }
    }

    fn with_seed(&self, seed: i64) -> RandomSource {
        match self {
            Self::Xoroshiro(s) => s.with_seed(seed),
            Self::Legacy(s) => s.with_seed(seed),
        }
    }
}

/// Hash a block position into a seed.
///
/// Matches vanilla's `Mth.getSeed(int, int, int)`, including the 32-bit multiply
/// on `x` before widening and the arithmetic shift at the end.
#[inline]
#[must_use]
pub const fn position_seed(x: i32, y: i32, z: i32) -> i64 {
    let l = (x.wrapping_mul(3_129_871) as i64)
        ^ (z as i64).wrapping_mul(116_129_781)
        ^ (y as i64);
    let l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l >> 16
}

/// Java's `String.hashCode()` over UTF-16 code units.
#[must_use]
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

/// The 128-bit seed vanilla derives from a string: the MD5 digest of its UTF-8
/// bytes read as two big-endian `u64` halves `(lo, hi)`.
#[must_use]
pub fn seed_from_hash_of(s: &str) -> (u64, u64) {
    let digest = md5::compute(s.as_bytes()).0;
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&digest[..8]);
    hi.copy_from_slice(&digest[8..]);
    (u64::from_be_bytes(lo), u64::from_be_bytes(hi))
}
