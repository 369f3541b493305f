//! Pointwise value maps over a single source.
//!
//! Each map knows how it transforms its source's bounds, so a [`Mapped`]
//! generator declares exact output bounds at construction.

use crate::chunk::Chunk;
use crate::error::{NoiseError, Result};
use crate::generator::{Bounds, NoiseGenerator, Seed};
use crate::region::Region;

/// A pure function of one sample plus its effect on bounds.
pub trait ValueMap: Send + Sync {
    /// Output bounds given the source's bounds.
    fn bounds(&self, source: Bounds) -> Bounds;

    fn map(&self, value: f64) -> f64;
}

/// `source` with `map` applied to every sample.
#[derive(Debug, Clone)]
pub struct Mapped<G, M> {
    source: G,
    map: M,
    bounds: Bounds,
}

impl<G, M: ValueMap> Mapped<G, M> {
    pub fn new<const D: usize>(source: G, map: M) -> Self
    where
        G: NoiseGenerator<D>,
    {
        let bounds = map.bounds(source.bounds());
        Self { source, map, bounds }
    }

    pub fn source(&self) -> &G {
        &self.source
    }
}

impl<G, M, const D: usize> NoiseGenerator<D> for Mapped<G, M>
where
    G: NoiseGenerator<D>,
    M: ValueMap,
{
    fn min(&self) -> f64 {
        self.bounds.min
    }

    fn max(&self) -> f64 {
        self.bounds.max
    }

    fn sample(&self, seed: Option<Seed>, region: &Region<D>) -> Result<Chunk<D>> {
        let mut chunk = self.source.sample(seed, region)?;
        chunk.map_in_place(|v| self.map.map(v));
        Ok(chunk)
    }
}

// ── Maps ─────────────────────────────────────────────────────────────────────

/// Limits values to `[min, max]`. Misordered limits are swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    limits: Bounds,
}

impl Clamp {
    pub fn new(min: f64, max: f64) -> Self {
        Self { limits: Bounds::sorted(min, max) }
    }
}

impl ValueMap for Clamp {
    fn bounds(&self, _source: Bounds) -> Bounds {
        self.limits
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        value.max(self.limits.min).min(self.limits.max)
    }
}

/// Affine map taking `from.min → to.min` and `from.max → to.max`.
///
/// A zero-width source range sends every value to `to.min`. Values outside
/// `from` are extrapolated, not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remap {
    from_min: f64,
    to_min: f64,
    factor: f64,
    target: Bounds,
}

impl Remap {
    pub fn new(from: Bounds, to: Bounds) -> Self {
        let span = from.span();
        let factor = if span == 0.0 { 0.0 } else { to.span() / span };
        Self { from_min: from.min, to_min: to.min, factor, target: Bounds::sorted(to.min, to.max) }
    }
}

impl ValueMap for Remap {
    fn bounds(&self, _source: Bounds) -> Bounds {
        self.target
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        self.to_min + (value - self.from_min) * self.factor
    }
}

/// Mirrors values within the source range: `min + max - v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invert {
    pivot: f64,
}

impl Invert {
    pub fn new(source: Bounds) -> Self {
        Self { pivot: source.min + source.max }
    }
}

impl ValueMap for Invert {
    fn bounds(&self, source: Bounds) -> Bounds {
        source
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        self.pivot - value
    }
}

/// Adds a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset(pub f64);

impl ValueMap for Offset {
    fn bounds(&self, source: Bounds) -> Bounds {
        Bounds::new(source.min + self.0, source.max + self.0)
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        value + self.0
    }
}

/// Multiplies by a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor(pub f64);

impl ValueMap for Factor {
    fn bounds(&self, source: Bounds) -> Bounds {
        Bounds::sorted(source.min * self.0, source.max * self.0)
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        value * self.0
    }
}

/// An arbitrary function with caller-declared bounds.
///
/// Nothing checks that `f` stays within the declared bounds; a lying `Apply`
/// makes every bound derived from it above unsound.
#[derive(Clone, Copy)]
pub struct Apply<F> {
    f: F,
    declared: Bounds,
}

impl<F> Apply<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(f: F, min: f64, max: f64) -> Self {
        Self { f, declared: Bounds::new(min, max) }
    }
}

impl<F> std::fmt::Debug for Apply<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Apply").field("declared", &self.declared).finish_non_exhaustive()
    }
}

impl<F> ValueMap for Apply<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn bounds(&self, _source: Bounds) -> Bounds {
        self.declared
    }

    #[inline]
    fn map(&self, value: f64) -> f64 {
        (self.f)(value)
    }
}

/// Odd sigmoid centred on the source midpoint that keeps both endpoints.
///
/// With `r` the half-range, `c` the midpoint, `s = |gradient|` and `p` the
/// power: `f(v) = ±(1 + (r·s)^p)^(1/p) · (v - c) / (1 + |s·(v - c)|^p)^(1/p) + c`.
/// A negative gradient flips the curve, swapping the endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sigmoid {
    centre: f64,
    steepness: f64,
    power: f64,
    numerator: f64,
}

impl Sigmoid {
    pub fn new(source: Bounds, gradient: f64, power: f64) -> Result<Self> {
        if power == 0.0 {
            return Err(NoiseError::invalid("power", "sigmoid power must be non-zero"));
        }
        let half = source.span() / 2.0;
        let steepness = gradient.abs();
        let sign = if gradient < 0.0 { -1.0 } else { 1.0 };
        let numerator = if power > 0.0 {
            sign * (1.0 + (half * steepness).powf(power)).powf(1.0 / power)
        } else {
            // Negative powers: the formula divided through by `s·|v - c|`, so
            // neither small offsets nor a zero gradient overflow.
            sign * half * (1.0 + (half * steepness).powf(-power)).powf(1.0 / power)
        };
        Ok(Self { centre: half + source.min, steepness, power, numerator })
    }
}

impl ValueMap for Sigmoid {
    fn bounds(&self, source: Bounds) -> Bounds {
        source
    }

    fn map(&self, value: f64) -> f64 {
        let d = value - self.centre;
        if d == 0.0 {
            return self.centre;
        }
        let x = (self.steepness * d).abs();
        if self.power > 0.0 {
            let denominator = (1.0 + x.powf(self.power)).powf(1.0 / self.power);
            self.numerator * d / denominator + self.centre
        } else {
            let denominator = (1.0 + x.powf(-self.power)).powf(1.0 / self.power);
            self.numerator * d.signum() / denominator + self.centre
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{BesselNoise, BicubicNoise, Constant, TrilinearNoise};
    use crate::combinators::NoiseExt;
    use crate::test_support::{assert_bounds_sound, EPS};
    use approx::assert_abs_diff_eq;

    #[test]
    fn clamp_swaps_misordered_limits() {
        let c = Clamp::new(0.8, 0.2);
        assert_eq!(c.bounds(Bounds::UNIT), Bounds::new(0.2, 0.8));
        assert_eq!(c.map(0.9), 0.8);
        assert_eq!(c.map(-1.0), 0.2);
    }

    #[test]
    fn remap_hits_target_endpoints() {
        let r = Remap::new(Bounds::new(-0.625, 1.625), Bounds::new(10.0, 20.0));
        assert_abs_diff_eq!(r.map(-0.625), 10.0, epsilon = EPS);
        assert_abs_diff_eq!(r.map(1.625), 20.0, epsilon = EPS);
        assert_abs_diff_eq!(r.map(0.5), 15.0, epsilon = EPS);
    }

    #[test]
    fn remap_of_flat_source_goes_to_min() {
        let g = Constant::<2>::new(3.0).set_range(-1.0, 1.0);
        assert_eq!(g.get([0.0, 0.0]).unwrap(), -1.0);
        assert_eq!(g.bounds(), Bounds::new(-1.0, 1.0));
    }

    #[test]
    fn normalize_declares_unit_bounds_and_is_idempotent() {
        let once = BicubicNoise::new(3).normalize();
        assert_eq!((once.min(), once.max()), (0.0, 1.0));
        let a = once.get_chunk_uniform([0.0, 0.0], [16, 16], 0.31).unwrap();
        let twice = BicubicNoise::new(3).normalize().normalize();
        let b = twice.get_chunk_uniform([0.0, 0.0], [16, 16], 0.31).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(x, y, epsilon = EPS);
        }
    }

    #[test]
    fn invert_is_an_involution() {
        let source = BesselNoise::<2>::new(4);
        let plain = source.get_chunk_uniform([1.0, 2.0], [12, 12], 0.7).unwrap();
        let back = source.invert().invert().get_chunk_uniform([1.0, 2.0], [12, 12], 0.7).unwrap();
        for (x, y) in plain.as_slice().iter().zip(back.as_slice()) {
            assert_abs_diff_eq!(x, y, epsilon = EPS);
        }
        assert_eq!(source.invert().bounds(), source.bounds());
    }

    #[test]
    fn set_min_and_set_max_keep_other_end() {
        let g = TrilinearNoise::new(0).set_min(-2.0);
        assert_eq!(g.bounds(), Bounds::new(-2.0, 1.0));
        let h = TrilinearNoise::new(0).set_max(4.0);
        assert_eq!(h.bounds(), Bounds::new(0.0, 4.0));
    }

    #[test]
    fn factor_resorts_bounds_for_negative_scalars() {
        let g = BicubicNoise::new(0).multiply_scalar(-2.0);
        assert_eq!(g.bounds(), Bounds::new(-3.25, 1.25));
        assert_bounds_sound(&g, "negative factor");
    }

    #[test]
    fn sigmoid_keeps_endpoints_and_midpoint() {
        for (gradient, power) in [(4.0, 4.0), (0.5, 2.0), (12.0, 1.0), (3.0, -2.0)] {
            let s = Sigmoid::new(Bounds::new(-1.0, 3.0), gradient, power).unwrap();
            assert_abs_diff_eq!(s.map(-1.0), -1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(s.map(3.0), 3.0, epsilon = 1e-9);
            assert_eq!(s.map(1.0), 1.0);
        }
    }

    #[test]
    fn negative_gradient_swaps_endpoints() {
        let s = Sigmoid::new(Bounds::UNIT, -4.0, 4.0).unwrap();
        assert_abs_diff_eq!(s.map(0.0), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.map(1.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_power_is_finite_near_midpoint() {
        let s = Sigmoid::new(Bounds::new(-1.0, 1.0), 3.0, -2.0).unwrap();
        for v in [1e-200, -1e-300, 1e-9] {
            let r = s.map(v);
            assert!(r.is_finite() && (-1.0..=1.0).contains(&r), "{v} -> {r}");
        }
        let flat = Sigmoid::new(Bounds::UNIT, 0.0, -2.0).unwrap();
        assert_abs_diff_eq!(flat.map(0.7), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(flat.map(0.2), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sigmoid_rejects_zero_power() {
        let err = Sigmoid::new(Bounds::UNIT, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, NoiseError::InvalidArgument { name: "power", .. }));
        assert!(BicubicNoise::new(0).sigmoid(1.0, 0.0).is_err());
    }

    #[test]
    fn mapped_trees_respect_bounds() {
        assert_bounds_sound(&BicubicNoise::new(9).normalize(), "normalize");
        assert_bounds_sound(&BicubicNoise::new(9).clamp(0.2, 0.7), "clamp");
        assert_bounds_sound(&BicubicNoise::new(9).set_range(-5.0, 5.0), "range");
        assert_bounds_sound(&BicubicNoise::new(9).invert(), "invert");
        assert_bounds_sound(&BicubicNoise::new(9).add_scalar(2.5), "offset");
        assert_bounds_sound(&TrilinearNoise::new(9).subtract_scalar(0.5).multiply_scalar(3.0), "affine 3d");
    }

    #[test]
    fn apply_uses_declared_bounds_unchecked() {
        let g = BicubicNoise::new(1).apply(|v| v * 100.0, 0.0, 1.0);
        assert_eq!(g.bounds(), Bounds::UNIT);
        let v = g.get([0.25, 0.75]).unwrap();
        assert_abs_diff_eq!(v, BicubicNoise::new(1).get([0.25, 0.75]).unwrap() * 100.0, epsilon = EPS);
    }

    #[test]
    fn remap_over_lying_apply_stays_affine() {
        let p = [0.25, 0.75];
        let raw = BicubicNoise::new(1).get(p).unwrap() * 100.0;
        let g = BicubicNoise::new(1).apply(|v| v * 100.0, 0.0, 1.0).set_range(0.0, 10.0);
        assert_eq!(g.bounds(), Bounds::new(0.0, 10.0));
        assert_abs_diff_eq!(g.get(p).unwrap(), raw * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn remap_extrapolates_outside_source_range() {
        let r = Remap::new(Bounds::UNIT, Bounds::new(0.0, 10.0));
        assert_abs_diff_eq!(r.map(2.0), 20.0, epsilon = EPS);
        assert_abs_diff_eq!(r.map(-0.5), -5.0, epsilon = EPS);
    }

    #[test]
    fn sigmoid_stays_in_range_for_any_nonzero_parameters() {
        let params = [(4.0, 4.0), (2.0, 0.5), (3.0, -2.0), (-4.0, 4.0), (-1.5, 0.5), (-2.0, -2.0)];
        for (gradient, power) in params {
            let g = BicubicNoise::new(9).sigmoid(gradient, power).unwrap();
            assert_eq!(g.bounds(), BicubicNoise::new(9).bounds());
            assert_bounds_sound(&g, &format!("sigmoid({gradient}, {power})"));
            let t = TrilinearNoise::new(2).normalize().sigmoid(gradient, power).unwrap();
            assert_bounds_sound(&t, &format!("sigmoid 3d ({gradient}, {power})"));
        }
    }
}
