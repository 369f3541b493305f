//! Pointwise combination of two sources.

use crate::chunk::Chunk;
use crate::error::Result;
use crate::generator::{Bounds, NoiseGenerator, Seed};
use crate::region::Region;

/// An arithmetic operator and the bounds it produces from its operands'.
pub trait BinaryOp: Copy + Send + Sync + std::fmt::Debug {
    fn apply(a: f64, b: f64) -> f64;

    fn bounds(a: Bounds, b: Bounds) -> Bounds;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl BinaryOp for Sum {
    #[inline]
    fn apply(a: f64, b: f64) -> f64 {
        a + b
    }

    fn bounds(a: Bounds, b: Bounds) -> Bounds {
        Bounds::new(a.min + b.min, a.max + b.max)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Difference;

impl BinaryOp for Difference {
    #[inline]
    fn apply(a: f64, b: f64) -> f64 {
        a - b
    }

    fn bounds(a: Bounds, b: Bounds) -> Bounds {
        Bounds::new(a.min - b.max, a.max - b.min)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Product;

impl BinaryOp for Product {
    #[inline]
    fn apply(a: f64, b: f64) -> f64 {
        a * b
    }

    fn bounds(a: Bounds, b: Bounds) -> Bounds {
        let corners = [a.min * b.min, a.min * b.max, a.max * b.min, a.max * b.max];
        let min = corners.iter().copied().fold(f64::INFINITY, f64::min);
        let max = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Bounds::new(min, max)
    }
}

/// `Op(left, right)` evaluated sample by sample over the same region.
#[derive(Debug, Clone)]
pub struct Combined<L, R, Op> {
    left: L,
    right: R,
    op: Op,
    bounds: Bounds,
}

impl<L, R, Op: BinaryOp + Default> Combined<L, R, Op> {
    pub fn new<const D: usize>(left: L, right: R) -> Self
    where
        L: NoiseGenerator<D>,
        R: NoiseGenerator<D>,
    {
        let bounds = Op::bounds(left.bounds(), right.bounds());
        Self { left, right, op: Op::default(), bounds }
    }
}

impl<L, R, Op> Combined<L, R, Op> {
    pub fn operator(&self) -> Op
    where
        Op: Copy,
    {
        self.op
    }
}

impl<L, R, Op, const D: usize> NoiseGenerator<D> for Combined<L, R, Op>
where
    L: NoiseGenerator<D>,
    R: NoiseGenerator<D>,
    Op: BinaryOp,
{
    fn min(&self) -> f64 {
        self.bounds.min
    }

    fn max(&self) -> f64 {
        self.bounds.max
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let mut out = self.left.sample(seed, region)?;
        let right = self.right.sample(seed, region)?;
        for (a, &b) in out.as_mut_slice().iter_mut().zip(right.as_slice()) {
            *a = Op::apply(*a, b);
        }
        Ok(out)
    }
}
