//! The 48-bit linear congruential generator used by `java.util.Random`.

use super::{
    PositionalRandom, Random, RandomSource, RandomSplitter, java_string_hash, position_seed,
};

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// `java.util.Random`-compatible generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRandom {
    seed: u64,
}

impl LegacyRandom {
    /// Create a generator from a seed. Only the low 48 bits are significant.
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MASK,
        }
    }

    /// The scrambled 48-bit internal state.
    #[must_use]
    pub const fn state(&self) -> u64 {
        self.seed
    }

    /// Advance once and return the top `bits` bits of the new state, as `next(bits)`
    /// does in Java. `bits` must be in `1..=32`.
    #[inline]
    pub fn next_bits(&mut self, bits: u32) -> i32 {
        debug_assert!((1..=32).contains(&bits));
        self.seed = self
            .seed
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

impl Random for LegacyRandom {
    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next_bits(32)
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0, "bound must be positive");
        if bound & bound.wrapping_neg() == bound {
            return ((i64::from(bound) * i64::from(self.next_bits(31))) >> 31) as i32;
        }
        loop {
            let j = self.next_bits(31);
            let k = j % bound;
            if j.wrapping_sub(k).wrapping_add(bound - 1) >= 0 {
                return k;
            }
        }
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        let high = i64::from(self.next_bits(32));
        let low = i64::from(self.next_bits(32));
        (high << 32).wrapping_add(low)
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        self.next_bits(1) != 0
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 * FLOAT_UNIT
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        let high = i64::from(self.next_bits(26)) << 27;
        let low = i64::from(self.next_bits(27));
        (high + low) as f64 * DOUBLE_UNIT
    }

    fn consume_count(&mut self, count: u32) {
        for _ in 0..count {
            self.next_bits(32);
        }
    }

    fn fork(&mut self) -> Self {
        Self::from_seed(self.next_i64() as u64)
    }

    fn next_positional(&mut self) -> RandomSplitter {
        RandomSplitter::Legacy(LegacySplitter::new(self.next_i64()))
    }
}

/// Positional factory for [`LegacyRandom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySplitter {
    seed: i64,
}

impl LegacySplitter {
    /// Create a splitter over `seed`.
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}

impl PositionalRandom for LegacySplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        RandomSource::Legacy(LegacyRandom::from_seed(
            (position_seed(x, y, z) ^ self.seed) as u64,
        ))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        RandomSource::Legacy(LegacyRandom::from_seed(
            (i64::from(java_string_hash(name)) ^ self.seed) as u64,
        ))
    }

    fn with_seed(&self, seed: i64) -> RandomSource {
        RandomSource::Legacy(LegacyRandom::from_seed((seed ^ self.seed) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrambles_seed_into_48_bit_state() {
        let mut rng = LegacyRandom::from_seed(329_532_170_530_278);
        assert_eq!(rng.state(), 48_038_959_352_715);
        assert_eq!(rng.next_bits(32), 1_964_217_917);
    }

    #[test]
    fn matches_java_util_random() {
        let mut rng = LegacyRandom::from_seed(0);
        assert_eq!(rng.next_i32(), -1_155_484_576);
        assert_eq!(rng.next_i32(), -723_955_400);

        let mut rng = LegacyRandom::from_seed(42);
        assert_eq!(rng.next_i32_bounded(10), 0);
        assert_eq!(rng.next_i32_bounded(100), 63);
        assert_eq!(rng.next_i64(), -5_843_495_416_241_995_736);

        let mut rng = LegacyRandom::from_seed(0);
        assert!((rng.next_f64() - 0.730_967_787_376_657).abs() < 1e-15);
        assert!((rng.next_f32() - 0.240_536_39).abs() < 1e-7);
    }

    #[test]
    fn bounded_draws_stay_in_range() {
        let mut rng = LegacyRandom::from_seed(7);
        for bound in [1, 2, 3, 7, 16, 256, 1000, i32::MAX] {
            for _ in 0..64 {
                let v = rng.next_i32_bounded(bound);
                assert!((0..bound).contains(&v), "{v} outside [0, {bound})");
            }
        }
    }

    #[test]
    fn consume_count_skips_draws() {
        let mut a = LegacyRandom::from_seed(99);
        let mut b = LegacyRandom::from_seed(99);
        a.consume_count(262);
        for _ in 0..262 {
            b.next_i32();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn splitter_matches_reference_values() {
        let mut rng = LegacyRandom::from_seed(1234);
        let splitter = rng.next_positional();
        assert_eq!(splitter.at(1, 2, 3).next_i64(), 4_847_400_979_110_994_622);
        assert_eq!(
            splitter.with_hash_of("minecraft:offset").next_i64(),
            2_636_891_270_661_194_172
        );
    }
}
