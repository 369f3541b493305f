//! The combinator algebra.
//!
//! Every combinator wraps its sources in a new immutable generator whose
//! bounds are derived from theirs at construction. [`NoiseExt`] is the fluent
//! front end; the wrapper types live in the submodules:
//!
//! * [`transform`]: coordinate zoom and shift
//! * [`map`]: pointwise value maps (clamp, remap, invert, sigmoid, …)
//! * [`binary`]: sum, difference and product of two sources
//! * [`seed`]: fixed and derived seeds for sub-trees
//! * [`filter`]: convolution with a [`Kernel`]
//! * [`fractal`]: octave sums

pub mod binary;
pub mod filter;
pub mod fractal;
pub mod map;
pub mod seed;
pub mod transform;

use std::sync::Arc;

use crate::error::Result;
use crate::generator::{Bounds, BoxedNoise, NoiseGenerator, Seed, SharedNoise};
use crate::kernel::Kernel;

use binary::{Combined, Difference, Product, Sum};
use filter::KernelFilter;
use map::{Apply, Clamp, Factor, Invert, Mapped, Offset, Remap, Sigmoid};
use seed::{SeedMap, WithSeed};
use transform::{Scaled, Shifted};

/// Fluent construction of generator trees.
///
/// Implemented for every generator; each method consumes `self` and returns
/// the wrapped tree. Pass `&g`, `Arc<G>` or [`shared`](Self::shared) handles
/// to reuse one sub-tree in several places.
pub trait NoiseExt<const D: usize>: NoiseGenerator<D> + Sized {
    // ── Coordinates ──────────────────────────────────────────────────────────

    fn scale(self, factors: [f64; D]) -> Scaled<Self, D> {
        Scaled::new(self, factors)
    }

    fn scale_uniform(self, factor: f64) -> Scaled<Self, D> {
        Scaled::new(self, [factor; D])
    }

    fn shift(self, offset: [f64; D]) -> Shifted<Self, D> {
        Shifted::new(self, offset)
    }

    // ── Values ───────────────────────────────────────────────────────────────

    fn clamp(self, min: f64, max: f64) -> Mapped<Self, Clamp> {
        Mapped::new::<D>(self, Clamp::new(min, max))
    }

    /// Clamp to limits computed from the source's declared bounds.
    fn clamp_with<F>(self, limits: F) -> Mapped<Self, Clamp>
    where
        F: FnOnce(Bounds) -> Bounds,
    {
        let limits = limits(self.bounds());
        self.clamp(limits.min, limits.max)
    }

    /// Affinely remap the declared source range onto `[min, max]`.
    fn set_range(self, min: f64, max: f64) -> Mapped<Self, Remap> {
        let remap = Remap::new(self.bounds(), Bounds::new(min, max));
        Mapped::new::<D>(self, remap)
    }

    /// [`set_range`](Self::set_range) with the target computed from the
    /// source's declared bounds.
    fn set_range_with<F>(self, target: F) -> Mapped<Self, Remap>
    where
        F: FnOnce(Bounds) -> Bounds,
    {
        let target = target(self.bounds());
        self.set_range(target.min, target.max)
    }

    fn set_min(self, min: f64) -> Mapped<Self, Remap> {
        self.set_min_with(|_| min)
    }

    fn set_min_with<F>(self, min: F) -> Mapped<Self, Remap>
    where
        F: FnOnce(Bounds) -> f64,
    {
        self.set_range_with(|b| Bounds::new(min(b), b.max))
    }

    fn set_max(self, max: f64) -> Mapped<Self, Remap> {
        self.set_max_with(|_| max)
    }

    fn set_max_with<F>(self, max: F) -> Mapped<Self, Remap>
    where
        F: FnOnce(Bounds) -> f64,
    {
        self.set_range_with(|b| Bounds::new(b.min, max(b)))
    }

    fn normalize(self) -> Mapped<Self, Remap> {
        self.set_range(0.0, 1.0)
    }

    fn invert(self) -> Mapped<Self, Invert> {
        let invert = Invert::new(self.bounds());
        Mapped::new::<D>(self, invert)
    }

    fn add_scalar(self, value: f64) -> Mapped<Self, Offset> {
        Mapped::new::<D>(self, Offset(value))
    }

    fn subtract_scalar(self, value: f64) -> Mapped<Self, Offset> {
        Mapped::new::<D>(self, Offset(-value))
    }

    fn multiply_scalar(self, value: f64) -> Mapped<Self, Factor> {
        Mapped::new::<D>(self, Factor(value))
    }

    /// Apply `f` to every sample and declare the result lies in `[min, max]`.
    ///
    /// The declaration is trusted, not checked.
    fn apply<F>(self, f: F, min: f64, max: f64) -> Mapped<Self, Apply<F>>
    where
        F: Fn(f64) -> f64 + Send + Sync,
    {
        Mapped::new::<D>(self, Apply::new(f, min, max))
    }

    /// [`apply`](Self::apply) with the declared bounds computed from the
    /// source's declared bounds. Equally unchecked.
    fn apply_with<F, B>(self, f: F, bounds: B) -> Mapped<Self, Apply<F>>
    where
        F: Fn(f64) -> f64 + Send + Sync,
        B: FnOnce(Bounds) -> Bounds,
    {
        let declared = bounds(self.bounds());
        self.apply(f, declared.min, declared.max)
    }

    /// S-curve about the midpoint of the source range. Fails when `power == 0`.
    fn sigmoid(self, gradient: f64, power: f64) -> Result<Mapped<Self, Sigmoid>> {
        let sigmoid = Sigmoid::new(self.bounds(), gradient, power)?;
        Ok(Mapped::new::<D>(self, sigmoid))
    }

    // ── Combination ──────────────────────────────────────────────────────────

    fn add<G: NoiseGenerator<D>>(self, other: G) -> Combined<Self, G, Sum> {
        Combined::new::<D>(self, other)
    }

    fn subtract<G: NoiseGenerator<D>>(self, other: G) -> Combined<Self, G, Difference> {
        Combined::new::<D>(self, other)
    }

    fn multiply<G: NoiseGenerator<D>>(self, other: G) -> Combined<Self, G, Product> {
        Combined::new::<D>(self, other)
    }

    /// `self + others[0] + others[1] + …`, folded left.
    fn add_all<G, I>(self, others: I) -> BoxedNoise<D>
    where
        Self: 'static,
        G: NoiseGenerator<D> + 'static,
        I: IntoIterator<Item = G>,
    {
        others.into_iter().fold(self.boxed(), |acc, g| acc.add(g).boxed())
    }

    /// `self - others[0] - others[1] - …`, folded left.
    fn subtract_all<G, I>(self, others: I) -> BoxedNoise<D>
    where
        Self: 'static,
        G: NoiseGenerator<D> + 'static,
        I: IntoIterator<Item = G>,
    {
        others.into_iter().fold(self.boxed(), |acc, g| acc.subtract(g).boxed())
    }

    /// `self · others[0] · others[1] · …`, folded left.
    fn multiply_all<G, I>(self, others: I) -> BoxedNoise<D>
    where
        Self: 'static,
        G: NoiseGenerator<D> + 'static,
        I: IntoIterator<Item = G>,
    {
        others.into_iter().fold(self.boxed(), |acc, g| acc.multiply(g).boxed())
    }

    // ── Seeds ────────────────────────────────────────────────────────────────

    fn with_seed(self, seed: Seed) -> WithSeed<Self> {
        WithSeed::new(self, seed)
    }

    fn with_seed_fn<F>(self, derive: F) -> SeedMap<Self, F>
    where
        F: Fn(Seed) -> Seed + Send + Sync,
    {
        SeedMap::new(self, derive)
    }

    // ── Filtering ────────────────────────────────────────────────────────────

    fn kernel_filter(self, kernel: Kernel<D>) -> KernelFilter<Self, D> {
        KernelFilter::new(self, kernel)
    }

    // ── Erasure ──────────────────────────────────────────────────────────────

    fn boxed(self) -> BoxedNoise<D>
    where
        Self: 'static,
    {
        Box::new(self)
    }

    fn shared(self) -> SharedNoise<D>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<T: NoiseGenerator<D>, const D: usize> NoiseExt<D> for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{BicubicNoise, Constant};
    use crate::kernel::presets::gaussian5;
    use crate::test_support::assert_bounds_sound;

    #[test]
    fn shared_subtree_can_feed_two_branches() {
        let base = BicubicNoise::new(12).shared();
        let tree = base.clone().add(base.invert());
        // v + (min + max - v) is constant.
        let chunk = tree.get_chunk_uniform([0.0, 0.0], [8, 8], 0.4).unwrap();
        for &v in chunk.as_slice() {
            assert!((v - 1.0).abs() < 1e-12, "{v}");
        }
    }

    #[test]
    fn borrowed_generators_compose() {
        let base = BicubicNoise::new(3);
        let tree = (&base).multiply_scalar(2.0).add(&base);
        let p = [0.5, 0.5];
        assert_eq!(tree.get(p).unwrap(), base.get(p).unwrap() * 2.0 + base.get(p).unwrap());
    }

    #[test]
    fn sandbox_tree_respects_bounds() {
        let tree = BicubicNoise::new(3424)
            .scale_uniform(50.0)
            .shift([-128.0, -128.0])
            .normalize()
            .sigmoid(4.0, 4.0)
            .unwrap()
            .kernel_filter(gaussian5());
        assert_bounds_sound(&tree, "sandbox");
        assert_bounds_sound(&tree.boxed(), "boxed sandbox");
    }

    #[test]
    fn subtract_all_folds_left() {
        let g = Constant::<2>::new(1.0).subtract_all([Constant::new(0.25), Constant::new(0.5)]);
        assert_eq!(g.get([0.0, 0.0]).unwrap(), 0.25);
        assert_eq!((g.min(), g.max()), (0.25, 0.25));

        let base = BicubicNoise::new(5).shared();
        let tree = Constant::<2>::new(2.0).subtract_all([base.clone(), base.clone()]);
        let p = [0.4, 1.1];
        let v = base.get(p).unwrap();
        assert_eq!(tree.get(p).unwrap(), 2.0 - v - v);
        assert_eq!(tree.bounds(), Bounds::new(2.0 - base.max() - base.max(), 2.0 - base.min() - base.min()));
        assert_bounds_sound(&tree, "subtract_all");
    }

    #[test]
    fn empty_subtract_all_is_the_source() {
        let g = Constant::<2>::new(0.75).subtract_all(Vec::<Constant<2>>::new());
        assert_eq!(g.get([1.0, 1.0]).unwrap(), 0.75);
    }

    #[test]
    fn bound_closures_see_source_bounds() {
        let base = BicubicNoise::new(8);
        let source = base.bounds();

        let half = (&base).set_range_with(|b| Bounds::new(b.min / 2.0, b.max / 2.0));
        assert_eq!(half.bounds(), Bounds::new(source.min / 2.0, source.max / 2.0));

        let floored = (&base).set_min_with(|b| b.midpoint());
        assert_eq!(floored.bounds(), Bounds::new(source.midpoint(), source.max));
        let capped = (&base).set_max_with(|b| b.max + 1.0);
        assert_eq!(capped.bounds(), Bounds::new(source.min, source.max + 1.0));

        let inner = (&base).clamp_with(|b| Bounds::new(b.min + 0.5, b.max - 0.5));
        assert_eq!(inner.bounds(), Bounds::new(source.min + 0.5, source.max - 0.5));
        assert_bounds_sound(&inner, "clamp_with");

        let doubled = (&base).apply_with(|v| v * 2.0, |b| Bounds::new(b.min * 2.0, b.max * 2.0));
        assert_eq!(doubled.bounds(), Bounds::new(source.min * 2.0, source.max * 2.0));
        assert_bounds_sound(&doubled, "apply_with");
    }

    #[test]
    fn constants_fold_through_algebra() {
        let g = Constant::<3>::new(0.25).multiply_scalar(4.0).subtract(Constant::new(0.5)).clamp(0.0, 0.4);
        assert_eq!(g.get([0.0; 3]).unwrap(), 0.4);
        assert_eq!((g.min(), g.max()), (0.0, 0.4));
    }
}
