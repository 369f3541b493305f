//! Seeded 64-bit hashing of lattice keys.
//!
//! The generators only ever see the [`SeededHash`] trait; [`XxHash64`] is the
//! implementation every basis uses unless another one is injected.

use crate::generator::Seed;

const PRIME_1: u64 = 0x9E37_79B1_85EB_CA87;
const PRIME_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const PRIME_3: u64 = 0x1656_67B1_9E37_79F9;
const PRIME_4: u64 = 0x85EB_CA77_C2B2_AE63;
const PRIME_5: u64 = 0x27D4_EB2F_1656_67C5;

/// A deterministic seeded hash over one or two 64-bit keys.
///
/// Implementations must return the same value for the same `(seed, key)` in
/// every call and every process; the whole generator tree is only as
/// deterministic as this function.
pub trait SeededHash: Send + Sync {
    fn hash(&self, seed: Seed, key: u64) -> u64;

    fn hash_pair(&self, seed: Seed, first: u64, second: u64) -> u64;
}

/// xxHash64 restricted to 8- and 16-byte inputs.
///
/// A single key hashes as the little-endian bytes of `key`; a pair hashes as
/// the 16 bytes of `first` followed by `second`. The seed is sign-extended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XxHash64;

#[inline]
fn round(acc: u64, lane: u64) -> u64 {
    acc.wrapping_add(lane.wrapping_mul(PRIME_2))
        .rotate_left(31)
        .wrapping_mul(PRIME_1)
}

#[inline]
fn merge_lane(acc: u64, lane: u64) -> u64 {
    (acc ^ round(0, lane))
        .rotate_left(27)
        .wrapping_mul(PRIME_1)
        .wrapping_add(PRIME_4)
}

#[inline]
fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(PRIME_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME_3);
    h ^= h >> 32;
    h
}

#[inline]
fn seed_bits(seed: Seed) -> u64 {
    i64::from(seed) as u64
}

impl SeededHash for XxHash64 {
    #[inline]
    fn hash(&self, seed: Seed, key: u64) -> u64 {
        let acc = seed_bits(seed).wrapping_add(PRIME_5).wrapping_add(8);
        avalanche(merge_lane(acc, key))
    }

    #[inline]
    fn hash_pair(&self, seed: Seed, first: u64, second: u64) -> u64 {
        let acc = seed_bits(seed).wrapping_add(PRIME_5).wrapping_add(16);
        avalanche(merge_lane(merge_lane(acc, first), second))
    }
}
