//! Leaf generators: hashed lattice noise and constants.
//!
//! [`LatticeNoise`] assigns a hashed value in `[0, 1]` to every integer
//! lattice point and fills the space between them with an [`Interpolation`]
//! kernel applied once per axis. The kernel, dimension and hash are all type
//! parameters, so `LatticeNoise<Cubic, 2>` is bicubic noise and
//! `LatticeNoise<Linear, 3>` trilinear.

pub mod constant;
pub mod external;

pub use constant::Constant;
pub use external::NoiseFnSource;

use log::trace;

use crate::chunk::Chunk;
use crate::error::{NoiseError, Result};
use crate::generator::{NoiseGenerator, Seed};
use crate::hash::{SeededHash, XxHash64};
use crate::interpolate::{BesselCubic, Cosine, Cubic, Interpolation, Linear, MonotoneCubic, Nearest, Smootherstep};
use crate::region::{strides, Indices, Region};
use crate::sampler::HashSampler;

/// Beyond this magnitude a coordinate has no fractional part left and its
/// lattice neighbourhood no longer fits in an `i64`.
const MAX_COORDINATE: f64 = (1u64 << 62) as f64;

// ── Aliases ──────────────────────────────────────────────────────────────────

pub type NearestNoise<const D: usize> = LatticeNoise<Nearest, D>;
pub type LinearNoise<const D: usize> = LatticeNoise<Linear, D>;
pub type BilinearNoise = LinearNoise<2>;
pub type TrilinearNoise = LinearNoise<3>;
pub type CosineNoise<const D: usize> = LatticeNoise<Cosine, D>;
pub type SmootherstepNoise<const D: usize> = LatticeNoise<Smootherstep, D>;
pub type CubicNoise<const D: usize> = LatticeNoise<Cubic, D>;
pub type BicubicNoise = CubicNoise<2>;
pub type TricubicNoise = CubicNoise<3>;
pub type MonotoneCubicNoise<const D: usize> = LatticeNoise<MonotoneCubic, D>;
pub type BesselNoise<const D: usize> = LatticeNoise<BesselCubic, D>;

// ── Lattice noise ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct LatticeNoise<K, const D: usize, H = XxHash64> {
    seed: Seed,
    sampler: HashSampler<H>,
    kernel: K,
}

impl<K: Interpolation + Default, const D: usize> LatticeNoise<K, D> {
    pub fn new(seed: Seed) -> Self {
        Self::with_hasher(seed, XxHash64)
    }

    /// A generator with a seed drawn from the thread-local RNG.
    pub fn with_random_seed() -> Self {
        Self::new(rand::random())
    }
}

impl<K: Interpolation + Default, const D: usize, H: SeededHash> LatticeNoise<K, D, H> {
    pub fn with_hasher(seed: Seed, hasher: H) -> Self {
        Self { seed, sampler: HashSampler::new(hasher), kernel: K::default() }
    }
}

impl<K, const D: usize, H> LatticeNoise<K, D, H> {
    pub fn seed(&self) -> Seed {
        self.seed
    }
}

/// Where every sample along one axis reads its neighbourhood.
struct AxisPlan {
    /// Sorted, unique lattice coordinates touched along this axis.
    lattice: Vec<i64>,
    /// Position in `lattice` of each sample's first tap.
    first: Vec<usize>,
    /// Fraction of each sample within its cell.
    frac: Vec<f64>,
}

impl AxisPlan {
    fn new<K: Interpolation, const D: usize>(region: &Region<D>, axis: usize) -> Result<Self> {
        let steps = region.steps[axis];
        let mut lows = Vec::with_capacity(steps);
        let mut frac = Vec::with_capacity(steps);
        let mut lattice = Vec::with_capacity(steps * K::TAPS);

        for i in 0..steps {
            let p = region.position(axis, i);
            if !p.is_finite() || p.abs() >= MAX_COORDINATE {
                return Err(NoiseError::invalid(
                    "region",
                    format!("sample {i} on axis {axis} lies at {p}, outside the addressable lattice"),
                ));
            }
            let cell = p.floor();
            let low = cell as i64 - K::LOW_HALO as i64;
            lattice.extend((0..K::TAPS as i64).map(|tap| low + tap));
            lows.push(low);
            frac.push(p - cell);
        }

        lattice.sort_unstable();
        lattice.dedup();
        let first = lows.iter().map(|&low| lattice.partition_point(|&v| v < low)).collect();

        Ok(Self { lattice, first, frac })
    }
}

impl<K, const D: usize, H> NoiseGenerator<D> for LatticeNoise<K, D, H>
where
    K: Interpolation,
    H: SeededHash,
{
    fn min(&self) -> f64 {
        K::bounds(D).min
    }

    fn max(&self) -> f64 {
        K::bounds(D).max
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let mut out = Chunk::filled(region.steps, 0.0);
        if region.is_empty() {
            return Ok(out);
        }
        let seed = seed.unwrap_or(self.seed);

        let plans = (0..D).map(|axis| AxisPlan::new::<K, D>(region, axis)).collect::<Result<Vec<_>>>()?;
        let axes: [&[i64]; D] = std::array::from_fn(|k| plans[k].lattice.as_slice());
        trace!(
            "seed {seed}: {} lattice values for {} samples, axis extents {:?}",
            axes.iter().map(|a| a.len()).product::<usize>(),
            region.len(),
            axes.iter().map(|a| (a[0], a[a.len() - 1])).collect::<Vec<_>>(),
        );
        let values = self.sampler.hash_lattice(seed, axes);
        let values = values.as_slice();

        let lattice_strides = strides(std::array::from_fn::<usize, D, _>(|k| axes[k].len()));
        let taps: Vec<usize> = Indices::new([K::TAPS; D])
            .map(|tap| tap.iter().zip(&lattice_strides).map(|(t, s)| t * s).sum())
            .collect();
        let mut scratch = vec![0.0; taps.len()];

        for (slot, idx) in out.as_mut_slice().iter_mut().zip(Indices::new(region.steps)) {
            let base: usize = (0..D).map(|k| plans[k].first[idx[k]] * lattice_strides[k]).sum();
            for (s, &offset) in scratch.iter_mut().zip(&taps) {
                *s = values[base + offset];
            }

            // Collapse the last axis first; each pass leaves one value per
            // group of TAPS in the front of the buffer.
            let mut live = scratch.len();
            for axis in (0..D).rev() {
                let t = plans[axis].frac[idx[axis]];
                live /= K::TAPS;
                for g in 0..live {
                    let v = self.kernel.interpolate(t, &scratch[g * K::TAPS..(g + 1) * K::TAPS]);
                    scratch[g] = v;
                }
            }
            *slot = scratch[0];
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::test_support::{assert_bounds_sound, EPS};

    #[test]
    fn every_kernel_respects_its_bounds_2d() {
        assert_bounds_sound(&NearestNoise::<2>::new(1), "nearest");
        assert_bounds_sound(&BilinearNoise::new(1), "bilinear");
        assert_bounds_sound(&CosineNoise::<2>::new(1), "cosine");
        assert_bounds_sound(&SmootherstepNoise::<2>::new(1), "smootherstep");
        assert_bounds_sound(&BicubicNoise::new(1), "bicubic");
        assert_bounds_sound(&MonotoneCubicNoise::<2>::new(1), "monotone");
        assert_bounds_sound(&BesselNoise::<2>::new(1), "bessel");
    }

    #[test]
    fn every_kernel_respects_its_bounds_3d() {
        assert_bounds_sound(&TrilinearNoise::new(7), "trilinear");
        assert_bounds_sound(&TricubicNoise::new(7), "tricubic");
        assert_bounds_sound(&MonotoneCubicNoise::<3>::new(7), "monotone");
        assert_bounds_sound(&BesselNoise::<3>::new(7), "bessel");
    }

    #[test]
    fn declared_bounds_follow_kernel() {
        assert_eq!(BicubicNoise::new(0).bounds(), Cubic::bounds(2));
        assert_eq!(TricubicNoise::new(0).min(), -1.1875);
        assert_eq!(TrilinearNoise::new(0).max(), 1.0);
    }

    #[test]
    fn lattice_points_return_hashed_values() {
        let sampler = HashSampler::<XxHash64>::default();
        let linear = BilinearNoise::new(3424);
        let cubic = BicubicNoise::new(3424);
        for (x, y) in [(0, 0), (-4, 9), (123, -77)] {
            let expected = sampler.hash_value(3424, [x, y]);
            let p = [x as f64, y as f64];
            assert_abs_diff_eq!(linear.get(p).unwrap(), expected, epsilon = EPS);
            assert_abs_diff_eq!(cubic.get(p).unwrap(), expected, epsilon = EPS);
        }
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let g = TricubicNoise::new(99);
        let a = g.get_chunk([0.3, -8.1, 2.0], [5, 6, 7], [0.21, 0.4, -0.9]).unwrap();
        let b = g.get_chunk([0.3, -8.1, 2.0], [5, 6, 7], [0.21, 0.4, -0.9]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn chunk_matches_point_queries() {
        let g = BesselNoise::<2>::new(5);
        let region = Region::new([-3.7, 12.25], [9, 11], [0.37, 1.9]);
        let chunk = g.sample(None, &region).unwrap();
        for idx in chunk.indices() {
            let p = [region.position(0, idx[0]), region.position(1, idx[1])];
            assert_eq!(chunk[idx], g.get(p).unwrap(), "mismatch at {idx:?}");
        }
    }

    #[test]
    fn negative_steps_walk_backwards() {
        let g = BicubicNoise::new(11);
        let forward = g.get_chunk([1.5, -4.0], [6, 3], [0.5, 1.0]).unwrap();
        let backward = g.get_chunk([4.0, -4.0], [6, 3], [-0.5, 1.0]).unwrap();
        for x in 0..6 {
            for y in 0..3 {
                assert_eq!(forward[[x, y]], backward[[5 - x, y]]);
            }
        }
    }

    #[test]
    fn huge_steps_fetch_only_needed_cells() {
        let g = CubicNoise::<2>::new(2);
        let region = Region::new([0.5, 0.5], [4, 3], [1.0e7, -2.5e6]);
        let chunk = g.sample(None, &region).unwrap();
        for idx in chunk.indices() {
            let p = [region.position(0, idx[0]), region.position(1, idx[1])];
            assert_eq!(chunk[idx], g.get(p).unwrap());
        }
    }

    #[test]
    fn zero_steps_give_empty_chunk() {
        let g = BilinearNoise::new(0);
        let chunk = g.get_chunk_unit([0.0, 0.0], [0, 16]).unwrap();
        assert!(chunk.is_empty());
        assert_eq!(chunk.dims(), [0, 16]);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let g = TrilinearNoise::new(0);
        let err = g.get([0.0, f64::NAN, 1.0]).unwrap_err();
        assert!(matches!(err, NoiseError::InvalidArgument { .. }), "{err}");
        assert!(g.get_chunk_uniform([0.0; 3], [2; 3], f64::INFINITY).is_err());
    }

    #[test]
    fn seed_override_replaces_own_seed() {
        let own = BicubicNoise::new(1);
        let other = BicubicNoise::new(2);
        let region = Region::uniform([0.1, 0.2], [4, 4], 0.3);
        assert_eq!(own.sample(Some(2), &region).unwrap(), other.sample(None, &region).unwrap());
        assert_ne!(own.sample(None, &region).unwrap(), other.sample(None, &region).unwrap());
    }

    #[test]
    fn one_dimensional_noise_is_smooth() {
        let g = CubicNoise::<1>::new(8);
        let chunk = g.get_chunk_uniform([0.0], [1000], 0.001).unwrap();
        let max_jump = chunk.as_slice().windows(2).map(|w| (w[1] - w[0]).abs()).fold(0.0, f64::max);
        assert!(max_jump < 0.05, "adjacent samples jump by {max_jump}");
    }

    #[test]
    fn random_seed_constructor_is_usable() {
        let g = BicubicNoise::with_random_seed();
        let v = g.get([0.5, 0.5]).unwrap();
        assert!(g.bounds().contains(v));
    }
}
