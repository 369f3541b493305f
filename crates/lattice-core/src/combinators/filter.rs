//! Convolution filtering of a source with a [`Kernel`].

use log::trace;

use crate::chunk::Chunk;
use crate::error::Result;
use crate::generator::{Bounds, NoiseGenerator, Seed};
use crate::kernel::Kernel;
use crate::region::{strides, Indices, Region};

/// Correlates the source with a kernel on the query's own grid.
///
/// The source is fetched over the query region grown by `dims[k] / 2`
/// samples on both sides of every axis, then each output sample is
/// `Σ weight[j] · source[i + j] / divisor`. The kernel is not flipped and
/// nothing is clamped at the edges: the padding is real source data.
#[derive(Debug, Clone)]
pub struct KernelFilter<G, const D: usize> {
    source: G,
    kernel: Kernel<D>,
    bounds: Bounds,
}

impl<G: NoiseGenerator<D>, const D: usize> KernelFilter<G, D> {
    pub fn new(source: G, kernel: Kernel<D>) -> Self {
        let gain = kernel.max();
        let bounds = Bounds::sorted(source.min() * gain, source.max() * gain);
        Self { source, kernel, bounds }
    }

    pub fn kernel(&self) -> &Kernel<D> {
        &self.kernel
    }
}

impl<G: NoiseGenerator<D>, const D: usize> NoiseGenerator<D> for KernelFilter<G, D> {
    fn min(&self) -> f64 {
        self.bounds.min
    }

    fn max(&self) -> f64 {
        self.bounds.max
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let mut out = Chunk::filled(region.steps, 0.0);
        if region.is_empty() {
            return Ok(out);
        }

        let half = self.kernel.dims().map(|d| d / 2);
        let padded = region.padded(half, half);
        trace!("kernel filter: fetching {:?} for {:?}", padded.steps, region.steps);
        let source = self.source.sample(seed, &padded)?;
        let source_strides = strides(source.dims());
        let values = source.as_slice();

        let taps: Vec<usize> = Indices::new(self.kernel.dims())
            .map(|tap| tap.iter().zip(&source_strides).map(|(t, s)| t * s).sum())
            .collect();
        let weights = self.kernel.weights();
        let divisor = self.kernel.divisor();

        for (slot, idx) in out.as_mut_slice().iter_mut().zip(Indices::new(region.steps)) {
            let base: usize = idx.iter().zip(&source_strides).map(|(i, s)| i * s).sum();
            let acc: f64 = weights.iter().zip(&taps).map(|(w, &off)| w * values[base + off]).sum();
            *slot = acc / divisor;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{BicubicNoise, Constant, TrilinearNoise};
    use crate::combinators::NoiseExt;
    use crate::kernel::presets::{box_filter, gaussian3, gaussian5};
    use crate::test_support::{assert_bounds_sound, EPS};
    use approx::assert_abs_diff_eq;

    #[test]
    fn box_filter_preserves_constant_field() {
        let g = Constant::<2>::new(0.5).kernel_filter(box_filter([3, 3]).unwrap());
        let chunk = g.get_chunk_unit([-4.0, 7.0], [10, 10]).unwrap();
        for &v in chunk.as_slice() {
            assert_abs_diff_eq!(v, 0.5, epsilon = EPS);
        }
        assert_abs_diff_eq!(g.min(), 0.5, epsilon = EPS);
        assert_abs_diff_eq!(g.max(), 0.5, epsilon = EPS);
    }

    #[test]
    fn single_tap_kernel_is_identity() {
        let identity = Kernel::new([1, 1], vec![1.0], 1.0).unwrap();
        let base = BicubicNoise::new(8);
        let region = Region::uniform([1.5, 2.5], [7, 5], 0.3);
        assert_eq!(
            base.kernel_filter(identity).sample(None, &region).unwrap(),
            base.sample(None, &region).unwrap()
        );
    }

    #[test]
    fn filter_reads_neighbours_on_query_grid() {
        // Weight only the leftmost column: output at x equals source at x - 1.
        let shift = Kernel::from_columns(vec![vec![0.0, 1.0, 0.0], vec![0.0; 3], vec![0.0; 3]], 1.0).unwrap();
        let base = BicubicNoise::new(3);
        let filtered = base.kernel_filter(shift).get_chunk_uniform([0.0, 0.0], [4, 4], 0.5).unwrap();
        let moved = base.get_chunk_uniform([-0.5, 0.0], [4, 4], 0.5).unwrap();
        for (a, b) in filtered.as_slice().iter().zip(moved.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = EPS);
        }
    }

    #[test]
    fn even_kernels_pad_symmetrically() {
        let g = Constant::<2>::new(2.0).kernel_filter(box_filter([4, 2]).unwrap());
        let chunk = g.get_chunk_unit([0.0, 0.0], [3, 3]).unwrap();
        assert!(chunk.as_slice().iter().all(|&v| (v - 2.0).abs() < EPS));
    }

    #[test]
    fn filtered_trees_respect_bounds() {
        assert_bounds_sound(&BicubicNoise::new(4).kernel_filter(gaussian5()), "gaussian5");
        assert_bounds_sound(&BicubicNoise::new(4).normalize().kernel_filter(gaussian3()), "gaussian3");
        assert_bounds_sound(&TrilinearNoise::new(4).kernel_filter(box_filter([3, 3, 3]).unwrap()), "box 3d");
    }

    #[test]
    fn empty_query_skips_source() {
        let g = BicubicNoise::new(0).kernel_filter(gaussian3());
        assert!(g.get_chunk_unit([0.0, 0.0], [0, 3]).unwrap().is_empty());
    }
}
