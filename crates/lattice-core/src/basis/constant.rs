use crate::chunk::Chunk;
use crate::error::Result;
use crate::generator::{NoiseGenerator, Seed};
use crate::region::Region;

/// The same value everywhere, in any dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<const D: usize> {
    value: f64,
}

impl<const D: usize> Constant<D> {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl<const D: usize> NoiseGenerator<D> for Constant<D> {
    fn min(&self) -> f64 {
        self.value
    }

    fn max(&self) -> f64 {
        self.value
    }

    fn sample(&self, _seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        Ok(Chunk::filled(region.steps, self.value))
    }
}
