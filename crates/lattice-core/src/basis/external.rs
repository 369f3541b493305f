//! Adapter for generators from the `noise` crate.

use noise::NoiseFn;

use crate::chunk::Chunk;
use crate::error::{NoiseError, Result};
use crate::generator::{Bounds, NoiseGenerator, Seed};
use crate::region::{Indices, Region};

/// Exposes any [`NoiseFn`] as a leaf of the combinator algebra.
///
/// The wrapped function is evaluated point by point at every sample position.
/// It carries its own seed, so seed overrides from above are ignored. `noise`
/// functions do not publish their range; the caller declares it, e.g.
/// `[-1, 1]` for [`noise::Perlin`].
#[derive(Debug, Clone)]
pub struct NoiseFnSource<F, const D: usize> {
    source: F,
    bounds: Bounds,
}

impl<F, const D: usize> NoiseFnSource<F, D>
where
    F: NoiseFn<f64, D>,
{
    pub fn new(source: F, min: f64, max: f64) -> Self {
        Self { source, bounds: Bounds::sorted(min, max) }
    }
}

impl<const D: usize> NoiseFnSource<noise::Perlin, D>
where
    noise::Perlin: NoiseFn<f64, D>,
{
    /// Perlin noise with its nominal `[-1, 1]` range.
    pub fn perlin(seed: u32) -> Self {
        Self::new(noise::Perlin::new(seed), -1.0, 1.0)
    }
}

impl<F, const D: usize> NoiseGenerator<D> for NoiseFnSource<F, D>
where
    F: NoiseFn<f64, D> + Send + Sync,
{
    fn min(&self) -> f64 {
        self.bounds.min
    }

    fn max(&self) -> f64 {
        self.bounds.max
    }

    fn sample(&self, _seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let mut out = Chunk::filled(region.steps, 0.0);
        for (slot, idx) in out.as_mut_slice().iter_mut().zip(Indices::new(region.steps)) {
            let point: [f64; D] = std::array::from_fn(|k| region.position(k, idx[k]));
            if let Some(axis) = point.iter().position(|p| !p.is_finite()) {
                return Err(NoiseError::invalid(
                    "region",
                    format!("sample {idx:?} lies at {} on axis {axis}", point[axis]),
                ));
            }
            *slot = self.source.get(point);
        }
        Ok(out)
    }
}
