//! Seed control for sub-trees.

use crate::chunk::Chunk;
use crate::error::{NoiseError, Result};
use crate::generator::{NoiseGenerator, Seed};
use crate::region::Region;

/// Samples `source` with a fixed seed, whatever the caller passes.
#[derive(Debug, Clone)]
pub struct WithSeed<G> {
    source: G,
    seed: Seed,
}

impl<G> WithSeed<G> {
    pub fn new(source: G, seed: Seed) -> Self {
        Self { source, seed }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }
}

impl<G: NoiseGenerator<D>, const D: usize> NoiseGenerator<D> for WithSeed<G> {
    fn min(&self) -> f64 {
        self.source.min()
    }

    fn max(&self) -> f64 {
        self.source.max()
    }

    fn sample(&self, _seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        self.source.sample(Some(self.seed), region)
    }
}

/// Samples `source` with a seed derived from the caller's.
///
/// Needs a seed from above, either through a [`WithSeed`] ancestor or a
/// `*_with_seed` query; on the unseeded path it fails with
/// [`NoiseError::MissingSeed`].
#[derive(Clone)]
pub struct SeedMap<G, F> {
    source: G,
    derive: F,
}

impl<G, F> SeedMap<G, F>
where
    F: Fn(Seed) -> Seed + Send + Sync,
{
    pub fn new(source: G, derive: F) -> Self {
        Self { source, derive }
    }
}

impl<G: std::fmt::Debug, F> std::fmt::Debug for SeedMap<G, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedMap").field("source", &self.source).finish_non_exhaustive()
    }
}

impl<G, F, const D: usize> NoiseGenerator<D> for SeedMap<G, F>
where
    G: NoiseGenerator<D>,
    F: Fn(Seed) -> Seed + Send + Sync,
{
    fn min(&self) -> f64 {
        self.source.min()
    }

    fn max(&self) -> f64 {
        self.source.max()
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let seed = seed.ok_or(NoiseError::MissingSeed)?;
        self.source.sample(Some((self.derive)(seed)), region)
    }
}
