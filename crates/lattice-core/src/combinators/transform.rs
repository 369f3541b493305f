//! Coordinate transforms: the source is queried on a moved or zoomed grid.

use crate::chunk::Chunk;
use crate::error::Result;
use crate::generator::{NoiseGenerator, Seed};
use crate::region::Region;

/// Zooms the source by `factors` per axis.
///
/// The source is sampled at `origin / factor` with steps `step / factor`, so
/// a factor above 1 stretches features and a factor below 1 packs them
/// tighter. A zero factor produces non-finite coordinates, which lattice
/// sources reject at query time.
#[derive(Debug, Clone)]
pub struct Scaled<G, const D: usize> {
    source: G,
    factors: [f64; D],
}

impl<G, const D: usize> Scaled<G, D> {
    pub fn new(source: G, factors: [f64; D]) -> Self {
        Self { source, factors }
    }

    pub fn factors(&self) -> [f64; D] {
        self.factors
    }
}

impl<G: NoiseGenerator<D>, const D: usize> NoiseGenerator<D> for Scaled<G, D> {
    fn min(&self) -> f64 {
        self.source.min()
    }

    fn max(&self) -> f64 {
        self.source.max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        self.source.sample(seed, &region.zoomed(self.factors))
    }
}

/// Moves the sampling window by `offset`: the source is read at `origin + offset`.
#[derive(Debug, Clone)]
pub struct Shifted<G, const D: usize> {
    source: G,
    offset: [f64; D],
}

impl<G, const D: usize> Shifted<G, D> {
    pub fn new(source: G, offset: [f64; D]) -> Self {
        Self { source, offset }
    }

    pub fn offset(&self) -> [f64; D] {
        self.offset
    }
}

impl<G: NoiseGenerator<D>, const D: usize> NoiseGenerator<D> for Shifted<G, D> {
    fn min(&self) -> f64 {
        self.source.min()
    }

    fn max(&self) -> f64 {
        self.source.max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        self.source.sample(seed, &region.translated(self.offset))
    }
}
