//! Fractional Brownian motion assembled from the combinator algebra.
//!
//! fBm sums octaves with amplitude `gain^i` and frequency `lacunarity^i`.
//! Every octave is an ordinary generator tree, so the result carries exact
//! bounds like any other combination.

use log::debug;

use super::NoiseExt;
use crate::error::{NoiseError, Result};
use crate::generator::{BoxedNoise, NoiseGenerator};

/// Sum `octaves` layers, octave `i` built by `layer(i)`, zoomed in by
/// `lacunarity^i` and weighted by `gain^i`.
///
/// `layer` usually returns the same basis with a per-octave seed, e.g.
/// `|i| BicubicNoise::new(seed + i as i32)`.
pub fn fbm<const D: usize, G, F>(octaves: u32, lacunarity: f64, gain: f64, mut layer: F) -> Result<BoxedNoise<D>>
where
    G: NoiseGenerator<D> + 'static,
    F: FnMut(u32) -> G,
{
    if octaves == 0 {
        return Err(NoiseError::invalid("octaves", "fbm needs at least one octave"));
    }
    if !(lacunarity.is_finite() && lacunarity > 0.0) {
        return Err(NoiseError::invalid("lacunarity", format!("{lacunarity} is not a positive finite number")));
    }
    if !gain.is_finite() {
        return Err(NoiseError::invalid("gain", format!("{gain} is not finite")));
    }

    let octave = |i: u32, g: G| -> BoxedNoise<D> {
        g.scale_uniform(lacunarity.powi(-(i as i32))).multiply_scalar(gain.powi(i as i32)).boxed()
    };

    let mut sum = octave(0, layer(0));
    for i in 1..octaves {
        sum = sum.add(octave(i, layer(i))).boxed();
    }
    debug!("fbm: {octaves} octaves, lacunarity {lacunarity}, gain {gain}, bounds [{}, {}]", sum.min(), sum.max());
    Ok(sum)
}
