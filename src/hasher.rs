//! Key hashers: a prefix-bounded base-31 polynomial ([KeyHasher], the default) and
//! `rustc_hash`'s Fx for comparison, picked with [HasherKind].

use std::hash::{BuildHasherDefault, Hasher};

/// Only this many leading key bytes feed the hash.
pub const HASHED_PREFIX: usize = 8;

const POWERS: [u64; HASHED_PREFIX] = [
    1,
    31,
    961,
    29_791,
    923_521,
    28_629_151,
    887_503_681,
    27_512_614_111,
];

/// Odd multiplier used to spread the polynomial into the high bits.
const SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// `sum(key[i] * 31^i)` over the first [HASHED_PREFIX] bytes of `key`.
#[inline(always)]
pub fn polynomial_hash(key: &[u8]) -> u64 {
    key.iter()
        .zip(POWERS)
        .fold(0u64, |acc, (&b, p)| acc.wrapping_add(u64::from(b).wrapping_mul(p)))
}

/// Hasher for station-like keys: cost is bounded by the prefix length, not the key
/// length. Collisions between keys that share a prefix are resolved by the table's
/// key comparison.
#[derive(Default, Clone, Copy)]
pub struct KeyHasher {
    accumulator: u64,
}

pub type BuildKeyHasher = BuildHasherDefault<KeyHasher>;

impl Hasher for KeyHasher {
    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.accumulator = self.accumulator.wrapping_add(polynomial_hash(bytes));
    }

    // `[u8]::hash` prefixes the length; keys hash on their bytes alone.
    #[inline(always)]
    fn write_usize(&mut self, _len: usize) {}

    #[inline(always)]
    fn finish(&self) -> u64 {
        // the polynomial never reaches the top bits, which hashbrown uses for its tags
        self.accumulator.wrapping_mul(SPREAD)
    }
}

/// Hash function selectable at the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HasherKind {
    /// Base-31 polynomial over the first 8 key bytes.
    #[default]
    Poly,
    /// `rustc_hash::FxHasher` over the whole key.
    Fx,
}

pub type BuildFxHasher = BuildHasherDefault<rustc_hash::FxHasher>;
