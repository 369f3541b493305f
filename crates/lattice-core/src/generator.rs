//! The chunk sampling protocol every generator implements.

use std::sync::Arc;

use crate::chunk::Chunk;
use crate::error::Result;
use crate::region::Region;

/// Identifies a pseudo-random stream.
pub type Seed = i32;

/// A type-erased generator of dimension `D`.
pub type BoxedNoise<const D: usize> = Box<dyn NoiseGenerator<D>>;

/// A type-erased generator that can be shared between trees and threads.
pub type SharedNoise<const D: usize> = Arc<dyn NoiseGenerator<D>>;

/// Inclusive value bounds of a generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds spanning both values, whichever order they come in.
    pub fn sorted(a: f64, b: f64) -> Self {
        if a > b { Self::new(b, a) } else { Self::new(a, b) }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        self.min + self.span() / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A pure, immutable scalar field over `D`-dimensional space.
///
/// Implementors only provide [`min`](Self::min), [`max`](Self::max) and
/// [`sample`](Self::sample); the remaining methods are conveniences over
/// `sample`. Bounds are declared, not measured: every value a generator
/// returns lies in `[min, max]` up to floating rounding, except for trees
/// containing an [`Apply`](crate::combinators::map::Apply) whose caller lied
/// about its bounds.
pub trait NoiseGenerator<const D: usize>: Send + Sync {
    fn min(&self) -> f64;

    fn max(&self) -> f64;

    /// Sample every point of `region`.
    ///
    /// `seed` is `None` on the unseeded path: seeded leaves fall back to
    /// their own seed and seed-relative combinators fail with
    /// [`NoiseError::MissingSeed`](crate::NoiseError::MissingSeed).
    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>>;

    fn bounds(&self) -> Bounds {
        Bounds::new(self.min(), self.max())
    }

    fn get_chunk(&self, origin: [f64; D], steps: [usize; D], step_size: [f64; D]) -> Result<Chunk<D>> {
        self.sample(None, &Region::new(origin, steps, step_size))
    }

    fn get_chunk_uniform(&self, origin: [f64; D], steps: [usize; D], step_size: f64) -> Result<Chunk<D>> {
        self.sample(None, &Region::uniform(origin, steps, step_size))
    }

    fn get_chunk_unit(&self, origin: [f64; D], steps: [usize; D]) -> Result<Chunk<D>> {
        self.sample(None, &Region::unit(origin, steps))
    }

    fn get_chunk_with_seed(
        &self,
        seed: Seed,
        origin: [f64; D],
        steps: [usize; D],
        step_size: [f64; D],
    ) -> Result<Chunk<D>> {
        self.sample(Some(seed), &Region::new(origin, steps, step_size))
    }

    fn get_chunk_uniform_with_seed(
        &self,
        seed: Seed,
        origin: [f64; D],
        steps: [usize; D],
        step_size: f64,
    ) -> Result<Chunk<D>> {
        self.sample(Some(seed), &Region::uniform(origin, steps, step_size))
    }

    fn get_chunk_unit_with_seed(&self, seed: Seed, origin: [f64; D], steps: [usize; D]) -> Result<Chunk<D>> {
        self.sample(Some(seed), &Region::unit(origin, steps))
    }

    /// Value at a single point.
    fn get(&self, point: [f64; D]) -> Result<f64> {
        single(self.sample(None, &Region::point(point))?)
    }

    fn get_with_seed(&self, seed: Seed, point: [f64; D]) -> Result<f64> {
        single(self.sample(Some(seed), &Region::point(point))?)
    }
}

fn single<const D: usize>(chunk: Chunk<D>) -> Result<f64> {
    chunk
        .as_slice()
        .first()
        .copied()
        .ok_or_else(|| crate::NoiseError::invalid("point", "generator returned an empty chunk"))
}

impl<T: NoiseGenerator<D> + ?Sized, const D: usize> NoiseGenerator<D> for Box<T> {
    fn min(&self) -> f64 {
        (**self).min()
    }

    fn max(&self) -> f64 {
        (**self).max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        (**self).sample(seed, region)
    }
}

impl<T: NoiseGenerator<D> + ?Sized, const D: usize> NoiseGenerator<D> for Arc<T> {
    fn min(&self) -> f64 {
        (**self).min()
    }

    fn max(&self) -> f64 {
        (**self).max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        (**self).sample(seed, region)
    }
}

impl<T: NoiseGenerator<D> + ?Sized, const D: usize> NoiseGenerator<D> for &T {
    fn min(&self) -> f64 {
        (**self).min()
    }

    fn max(&self) -> f64 {
        (**self).max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        (**self).sample(seed, region)
    }
}
