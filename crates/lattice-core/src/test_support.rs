//! Shared assertions for generator tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generator::{NoiseGenerator, Seed};

/// Slack for floating rounding in bound checks.
pub const EPS: f64 = 1e-12;

/// Samples at least 10,000 points in randomly placed, randomly stepped chunks
/// and fails if any value leaves the generator's declared bounds.
pub fn assert_bounds_sound<const D: usize>(g: &impl NoiseGenerator<D>, label: &str) {
    assert_bounds_sound_seeded(g, None, label);
}

pub fn assert_bounds_sound_seeded<const D: usize>(g: &impl NoiseGenerator<D>, seed: Option<Seed>, label: &str) {
    let mut rng = StdRng::seed_from_u64(0xB0_0D5);
    let (min, max) = (g.min(), g.max());
    let mut seen = 0;
    while seen < 10_000 {
        let origin: [f64; D] = std::array::from_fn(|_| rng.gen_range(-1.0e4..1.0e4));
        let step: [f64; D] = std::array::from_fn(|_| rng.gen_range(-3.0..3.0));
        let chunk = g.sample(seed, &crate::region::Region::new(origin, [8; D], step)).unwrap();
        for &v in chunk.as_slice() {
            assert!(v >= min - EPS && v <= max + EPS, "{label}: {v} outside [{min}, {max}]");
        }
        seen += chunk.len();
    }
}
