//! The xoroshiro128++ generator.

use super::{
    PositionalRandom, Random, RandomSource, RandomSplitter, position_seed, seed_from_hash_of,
};

/// `2^64 / phi`, used to fill the upper half of a seed and to replace the
/// all-zero state.
const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
/// Fractional bits of `sqrt(2)`.
const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Stafford's "Mix13" 64-bit finalizer.
#[inline]
const fn mix_stafford_13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// xoroshiro128++ generator with vanilla seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoroshiro {
    lo: u64,
    hi: u64,
}

impl Xoroshiro {
    /// Create a generator from raw state. An all-zero state is replaced by
    /// `(GOLDEN_RATIO_64, SILVER_RATIO_64)`.
    #[must_use]
    pub const fn new(lo: u64, hi: u64) -> Self {
        if lo == 0 && hi == 0 {
            Self {
                lo: GOLDEN_RATIO_64,
                hi: SILVER_RATIO_64,
            }
        } else {
            Self { lo, hi }
        }
    }

    /// Create a generator from a 64-bit world seed, upgrading it to 128 bits.
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        let lo = seed ^ SILVER_RATIO_64;
        let hi = lo.wrapping_add(GOLDEN_RATIO_64);
        Self::new(mix_stafford_13(lo), mix_stafford_13(hi))
    }

    /// The raw `(lo, hi)` state.
    #[must_use]
    pub const fn state(&self) -> (u64, u64) {
        (self.lo, self.hi)
    }

    /// Advance once and return the raw 64-bit output.
    #[inline]
    pub const fn next_u64(&mut self) -> u64 {
        let lo = self.lo;
        let mut hi = self.hi;
        let out = lo.wrapping_add(hi).rotate_left(17).wrapping_add(lo);
        hi ^= lo;
        self.lo = lo.rotate_left(49) ^ hi ^ (hi << 21);
        self.hi = hi.rotate_left(28);
        out
    }

    /// The top `bits` bits of the next output.
    #[inline]
    pub const fn next_bits(&mut self, bits: u32) -> u64 {
        self.next_u64() >> (64 - bits)
    }
}

impl Random for Xoroshiro {
    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next_u64() as i32
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0, "bound must be positive");
        let bound = u64::from(bound as u32);
        let mut m = u64::from(self.next_u64() as u32) * bound;
        let mut low = m & 0xFFFF_FFFF;
        if low < bound {
            let threshold = u64::from((bound as u32).wrapping_neg() % bound as u32);
            while low < threshold {
                m = u64::from(self.next_u64() as u32) * bound;
                low = m & 0xFFFF_FFFF;
            }
        }
        (m >> 32) as i32
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 != 0
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 * FLOAT_UNIT
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.next_bits(53) as f64 * DOUBLE_UNIT
    }

    fn consume_count(&mut self, count: u32) {
        for _ in 0..count {
            self.next_u64();
        }
    }

    fn fork(&mut self) -> Self {
        let lo = self.next_u64();
        let hi = self.next_u64();
        Self::new(lo, hi)
    }

    fn next_positional(&mut self) -> RandomSplitter {
        let lo = self.next_u64();
        let hi = self.next_u64();
        RandomSplitter::Xoroshiro(XoroshiroSplitter::new(lo, hi))
    }
}

/// Positional factory for [`Xoroshiro`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XoroshiroSplitter {
    lo: u64,
    hi: u64,
}

impl XoroshiroSplitter {
    /// Create a splitter over raw 128-bit seed material.
    #[must_use]
    pub const fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }
}

impl PositionalRandom for XoroshiroSplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        RandomSource::Xoroshiro(Xoroshiro::new(
            position_seed(x, y, z) as u64 ^ self.lo,
            self.hi,
        ))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        let (lo, hi) = seed_from_hash_of(name);
        RandomSource::Xoroshiro(Xoroshiro::new(lo ^ self.lo, hi ^ self.hi))
    }

    fn with_seed(&self, seed: i64) -> RandomSource {
        let seed = seed as u64;
        RandomSource::Xoroshiro(Xoroshiro::new(seed ^ self.lo, seed ^ self.hi))
    }
}
