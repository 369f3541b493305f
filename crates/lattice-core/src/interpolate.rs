//! One-dimensional interpolation kernels.
//!
//! A kernel reads `TAPS` consecutive lattice values and a fraction `t` in
//! `[0, 1]`, where `t = 0` sits on the value at `LOW_HALO` and `t = 1` on the
//! one after it. Basis generators apply the same kernel once per axis to get
//! bilinear, bicubic, trilinear or tricubic interpolation.

use std::f64::consts::PI;
use std::fmt::Debug;

use crate::generator::Bounds;

pub trait Interpolation: Copy + Send + Sync + Debug + 'static {
    /// Lattice values consumed per axis.
    const TAPS: usize;
    /// Lattice values taken below the cell containing the sample.
    const LOW_HALO: usize;
    /// How far past its inputs' span the kernel can reach on either side,
    /// as a fraction of that span.
    const OVERSHOOT: f64;

    fn interpolate(&self, t: f64, values: &[f64]) -> f64;

    /// Output bounds after interpolating `[0, 1]` inputs along `dims` axes.
    fn bounds(dims: usize) -> Bounds {
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..dims {
            let reach = Self::OVERSHOOT * (hi - lo);
            lo -= reach;
            hi += reach;
        }
        Bounds::new(lo, hi)
    }
}

#[inline]
fn lerp(t: f64, x0: f64, x1: f64) -> f64 {
    x0 * (1.0 - t) + x1 * t
}

/// No interpolation: the value of the enclosing cell's lower corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl Interpolation for Nearest {
    const TAPS: usize = 1;
    const LOW_HALO: usize = 0;
    const OVERSHOOT: f64 = 0.0;

    #[inline]
    fn interpolate(&self, _t: f64, values: &[f64]) -> f64 {
        values[0]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolation for Linear {
    const TAPS: usize = 2;
    const LOW_HALO: usize = 0;
    const OVERSHOOT: f64 = 0.0;

    #[inline]
    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        lerp(t, values[0], values[1])
    }
}

/// Linear blend eased by half a cosine period.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Interpolation for Cosine {
    const TAPS: usize = 2;
    const LOW_HALO: usize = 0;
    const OVERSHOOT: f64 = 0.0;

    #[inline]
    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        let eased = (1.0 - (t * PI).cos()) * 0.5;
        lerp(eased, values[0], values[1])
    }
}

/// Linear blend eased by `6t⁵ - 15t⁴ + 10t³`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smootherstep;

impl Interpolation for Smootherstep {
    const TAPS: usize = 2;
    const LOW_HALO: usize = 0;
    const OVERSHOOT: f64 = 0.0;

    #[inline]
    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        let eased = t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
        lerp(eased, values[0], values[1])
    }
}

/// Cubic through four neighbours, interpolating between the middle two.
///
/// The outer weights `-t(1-t)²` and `-t²(1-t)` are negative, so the curve
/// rings up to a quarter of the input span past either end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cubic;

impl Interpolation for Cubic {
    const TAPS: usize = 4;
    const LOW_HALO: usize = 1;
    const OVERSHOOT: f64 = 0.25;

    #[inline]
    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        let (x0, x1, x2, x3) = (values[0], values[1], values[2], values[3]);
        let t2 = t * t;
        let t3 = t2 * t;

        let p = (x3 - x2) - (x0 - x1);
        let q = x0 - x1 - p;
        let r = x2 - x0;
        let s = x1;

        p * t3 + q * t2 + r * t + s
    }
}

/// Cubic Hermite with Fritsch–Carlson limited tangents.
///
/// Tangents vanish at local extrema and are scaled back whenever they would
/// let the segment leave `[min(x1, x2), max(x1, x2)]`; the result is clamped
/// to that band as well to absorb rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotoneCubic;

impl MonotoneCubic {
    /// Tangent at a knot from its two adjacent secants.
    #[inline]
    fn knot_tangent(before: f64, after: f64) -> f64 {
        if before == 0.0 || after == 0.0 || (before < 0.0) != (after < 0.0) {
            0.0
        } else {
            (before + after) * 0.5
        }
    }
}

impl Interpolation for MonotoneCubic {
    const TAPS: usize = 4;
    const LOW_HALO: usize = 1;
    const OVERSHOOT: f64 = 0.0;

    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        let (x0, x1, x2, x3) = (values[0], values[1], values[2], values[3]);
        let s0 = x1 - x0;
        let s1 = x2 - x1;
        let s2 = x3 - x2;

        let (mut m0, mut m1) = if s1 == 0.0 {
            (0.0, 0.0)
        } else {
            (Self::knot_tangent(s0, s1), Self::knot_tangent(s1, s2))
        };

        if s1 != 0.0 {
            let alpha = m0 / s1;
            let beta = m1 / s1;
            let norm = alpha * alpha + beta * beta;
            if norm > 9.0 {
                let tau = 3.0 / norm.sqrt();
                m0 = tau * alpha * s1;
                m1 = tau * beta * s1;
            }
        }

        let result = (((m0 + m1 - 2.0 * s1) * t + (3.0 * s1 - 2.0 * m0 - m1)) * t + m0) * t + x1;
        result.max(x1.min(x2)).min(x1.max(x2))
    }
}

/// Bessel's central-difference cubic evaluated about the segment midpoint.
///
/// Smoother than [`Cubic`] with half the overshoot (the outer weights sum to
/// `t(t-1)/2`, at most an eighth of the span).
#[derive(Debug, Clone, Copy, Default)]
pub struct BesselCubic;

impl Interpolation for BesselCubic {
    const TAPS: usize = 4;
    const LOW_HALO: usize = 1;
    const OVERSHOOT: f64 = 0.125;

    #[inline]
    fn interpolate(&self, t: f64, values: &[f64]) -> f64 {
        let (x0, x1, x2, x3) = (values[0], values[1], values[2], values[3]);
        let d1x0 = x1 - x0;
        let d1x1 = x2 - x1;
        let d1x2 = x3 - x2;

        let d2x0 = d1x1 - d1x0;
        let d2x1 = d1x2 - d1x1;
        let d3x0 = d2x1 - d2x0;

        let tt1 = t * (t - 1.0);
        let th = t - 0.5;

        (x1 + x2) / 2.0 + th * d1x1 + tt1 * (d2x0 + d2x1) / 4.0 + th * tt1 * d3x0 / 6.0
    }
}
