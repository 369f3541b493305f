//! Lattice hash sampling: integer lattice points to uniform values in `[0, 1]`.
//!
//! Coordinates are packed two per 64-bit word, low axis in the low half:
//! 1D hashes `x as u32`, 2D hashes `(y as u32) << 32 | x as u32`, 3D hashes the
//! pair `(xy, z as u32)` and 4D the pair `(xy, (w as u32) << 32 | z as u32)`.
//! Higher dimensions keep folding further words through `hash_pair`.

use crate::chunk::Chunk;
use crate::generator::Seed;
use crate::hash::{SeededHash, XxHash64};
use crate::region::Indices;

#[derive(Debug, Clone, Copy, Default)]
pub struct HashSampler<H = XxHash64> {
    hasher: H,
}

#[inline]
fn pack(pair: &[i64]) -> u64 {
    let lo = pair[0] as u32 as u64;
    let hi = pair.get(1).map_or(0, |&v| v as u32 as u64);
    (hi << 32) | lo
}

impl<H: SeededHash> HashSampler<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Raw 64-bit hash of a lattice point.
    pub fn lattice_hash<const D: usize>(&self, seed: Seed, lattice: &[i64; D]) -> u64 {
        let mut words = lattice.chunks(2).map(pack);
        match (words.next(), words.next()) {
            (None, _) => self.hasher.hash(seed, 0),
            (Some(single), None) => self.hasher.hash(seed, single),
            (Some(first), Some(second)) => {
                let head = self.hasher.hash_pair(seed, first, second);
                words.fold(head, |acc, word| self.hasher.hash_pair(seed, acc, word))
            }
        }
    }

    /// Value of a lattice point, uniformly distributed over `[0, 1]`.
    #[inline]
    pub fn hash_value<const D: usize>(&self, seed: Seed, lattice: [i64; D]) -> f64 {
        let h = self.lattice_hash(seed, &lattice);
        (h as f64 / u64::MAX as f64).clamp(0.0, 1.0)
    }

    /// Values over the contiguous lattice box starting at `origin`.
    pub fn hash_values<const D: usize>(&self, seed: Seed, origin: [i64; D], dims: [usize; D]) -> Chunk<D> {
        let mut out = Chunk::filled(dims, 0.0);
        for (slot, idx) in out.as_mut_slice().iter_mut().zip(Indices::new(dims)) {
            let mut point = origin;
            for k in 0..D {
                point[k] = point[k].wrapping_add(idx[k] as i64);
            }
            *slot = self.hash_value(seed, point);
        }
        out
    }

    /// Values over the cartesian product of per-axis lattice coordinates.
    ///
    /// Entry `[i, j, …]` of the result is the value at
    /// `(axes[0][i], axes[1][j], …)`.
    pub fn hash_lattice<const D: usize>(&self, seed: Seed, axes: [&[i64]; D]) -> Chunk<D> {
        let dims: [usize; D] = std::array::from_fn(|k| axes[k].len());
        let mut out = Chunk::filled(dims, 0.0);
        for (slot, idx) in out.as_mut_slice().iter_mut().zip(Indices::new(dims)) {
            let point: [i64; D] = std::array::from_fn(|k| axes[k][idx[k]]);
            *slot = self.hash_value(seed, point);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_matches_documented_layout() {
        let s = HashSampler::new(XxHash64);
        let h = XxHash64;
        assert_eq!(s.lattice_hash(9, &[-3i64]), h.hash(9, (-3i32) as u32 as u64));
        assert_eq!(s.lattice_hash(9, &[5i64, 7]), h.hash(9, (7u64 << 32) | 5));
        assert_eq!(s.lattice_hash(9, &[5i64, 7, 2]), h.hash_pair(9, (7u64 << 32) | 5, 2));
        assert_eq!(
            s.lattice_hash(9, &[5i64, 7, 2, 1]),
            h.hash_pair(9, (7u64 << 32) | 5, (1u64 << 32) | 2)
        );
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let s = HashSampler::<XxHash64>::default();
        for x in -50..50 {
            for y in -50..50 {
                let v = s.hash_value(1, [x, y]);
                assert!((0.0..=1.0).contains(&v), "value {v} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn box_and_lattice_agree_with_points() {
        let s = HashSampler::<XxHash64>::default();
        let boxed = s.hash_values(4, [-2, 10, 3], [3, 2, 2]);
        let xs = [-2i64, -1, 0];
        let ys = [10i64, 11];
        let zs = [3i64, 4];
        let sparse = s.hash_lattice(4, [&xs[..], &ys[..], &zs[..]]);
        assert_eq!(boxed, sparse);
        assert_eq!(boxed[[2, 1, 0]], s.hash_value(4, [0, 11, 3]));
    }

    #[test]
    fn sparse_lattice_skips_gaps() {
        let s = HashSampler::<XxHash64>::default();
        let xs = [0i64, 1_000_000];
        let ys = [-7i64];
        let chunk = s.hash_lattice(0, [&xs[..], &ys[..]]);
        assert_eq!(chunk.dims(), [2, 1]);
        assert_eq!(chunk[[1, 0]], s.hash_value(0, [1_000_000, -7]));
    }
}
