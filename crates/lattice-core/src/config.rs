//! Serializable descriptions of generator trees.
//!
//! A [`GeneratorConfig`] is plain data: it can be stored as JSON, passed over
//! the wasm boundary, and turned into a live generator of any dimension with
//! [`GeneratorConfig::build`]. Closure-based combinators (`apply`,
//! `with_seed_fn` with an arbitrary function) have no config form;
//! `seed_offset` covers the common derived-seed case.

use log::debug;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::basis::{Constant, LatticeNoise, NoiseFnSource};
use crate::combinators::fractal::fbm;
use crate::combinators::NoiseExt;
use crate::error::{NoiseError, Result};
use crate::generator::{BoxedNoise, NoiseGenerator, Seed};
use crate::interpolate::{BesselCubic, Cosine, Cubic, Interpolation, Linear, MonotoneCubic, Nearest, Smootherstep};
use crate::kernel::{presets, Kernel};

/// Interpolation kernel of a lattice basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisKind {
    Nearest,
    Linear,
    Cosine,
    Smootherstep,
    Cubic,
    MonotoneCubic,
    Bessel,
}

impl BasisKind {
    pub const ALL: [BasisKind; 7] = [
        BasisKind::Nearest,
        BasisKind::Linear,
        BasisKind::Cosine,
        BasisKind::Smootherstep,
        BasisKind::Cubic,
        BasisKind::MonotoneCubic,
        BasisKind::Bessel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BasisKind::Nearest => "nearest",
            BasisKind::Linear => "linear",
            BasisKind::Cosine => "cosine",
            BasisKind::Smootherstep => "smootherstep",
            BasisKind::Cubic => "cubic",
            BasisKind::MonotoneCubic => "monotone_cubic",
            BasisKind::Bessel => "bessel",
        }
    }

    /// A lattice basis of this kind in `D` dimensions.
    pub fn build<const D: usize>(self, seed: Seed) -> BoxedNoise<D> {
        fn leaf<K: Interpolation + Default, const D: usize>(seed: Seed) -> BoxedNoise<D> {
            LatticeNoise::<K, D>::new(seed).boxed()
        }
        match self {
            BasisKind::Nearest => leaf::<Nearest, D>(seed),
            BasisKind::Linear => leaf::<Linear, D>(seed),
            BasisKind::Cosine => leaf::<Cosine, D>(seed),
            BasisKind::Smootherstep => leaf::<Smootherstep, D>(seed),
            BasisKind::Cubic => leaf::<Cubic, D>(seed),
            BasisKind::MonotoneCubic => leaf::<MonotoneCubic, D>(seed),
            BasisKind::Bessel => leaf::<BesselCubic, D>(seed),
        }
    }
}

/// Convolution kernel of a `kernel_filter` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelConfig {
    Gaussian3,
    Gaussian5,
    /// Uniform mean; a single entry in `dims` applies to every axis.
    Box { dims: Vec<usize> },
    /// Weights stored last axis fastest.
    Custom { dims: Vec<usize>, weights: Vec<f64>, divisor: f64 },
}

impl KernelConfig {
    pub fn build<const D: usize>(&self) -> Result<Kernel<D>> {
        match self {
            KernelConfig::Gaussian3 => planar("kernel", presets::gaussian3()),
            KernelConfig::Gaussian5 => planar("kernel", presets::gaussian5()),
            KernelConfig::Box { dims } => presets::box_filter(per_axis("dims", dims)?),
            KernelConfig::Custom { dims, weights, divisor } => {
                Kernel::new(exact("dims", dims)?, weights.clone(), *divisor)
            }
        }
    }
}

/// A generator tree. Vector fields (`scale`, `offset`) hold one entry per
/// axis, or a single entry applied to every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    Basis { kind: BasisKind, seed: Seed },
    Constant { value: f64 },
    /// `noise::Perlin`, declared over `[-1, 1]`. Up to four dimensions.
    Perlin { seed: u32 },
    Fbm { kind: BasisKind, seed: Seed, octaves: u32, lacunarity: f64, gain: f64 },

    Scale { source: Box<GeneratorConfig>, scale: Vec<f64> },
    Shift { source: Box<GeneratorConfig>, offset: Vec<f64> },

    Clamp { source: Box<GeneratorConfig>, min: f64, max: f64 },
    Range { source: Box<GeneratorConfig>, min: f64, max: f64 },
    Normalize { source: Box<GeneratorConfig> },
    Invert { source: Box<GeneratorConfig> },
    AddScalar { source: Box<GeneratorConfig>, value: f64 },
    SubtractScalar { source: Box<GeneratorConfig>, value: f64 },
    MultiplyScalar { source: Box<GeneratorConfig>, value: f64 },
    Sigmoid { source: Box<GeneratorConfig>, gradient: f64, power: f64 },

    Add { sources: Vec<GeneratorConfig> },
    Subtract { left: Box<GeneratorConfig>, right: Box<GeneratorConfig> },
    Multiply { sources: Vec<GeneratorConfig> },

    WithSeed { source: Box<GeneratorConfig>, seed: Seed },
    /// Samples `source` with the caller's seed plus `offset`.
    SeedOffset { source: Box<GeneratorConfig>, offset: Seed },

    KernelFilter { source: Box<GeneratorConfig>, kernel: KernelConfig },
}

impl Default for GeneratorConfig {
    /// Bicubic noise, seed 42, features ~50 units wide, normalised to `[0, 1]`.
    fn default() -> Self {
        GeneratorConfig::Normalize {
            source: Box::new(GeneratorConfig::Scale {
                source: Box::new(GeneratorConfig::Basis { kind: BasisKind::Cubic, seed: 42 }),
                scale: vec![50.0],
            }),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorConfig::Basis { .. } => "basis",
            GeneratorConfig::Constant { .. } => "constant",
            GeneratorConfig::Perlin { .. } => "perlin",
            GeneratorConfig::Fbm { .. } => "fbm",
            GeneratorConfig::Scale { .. } => "scale",
            GeneratorConfig::Shift { .. } => "shift",
            GeneratorConfig::Clamp { .. } => "clamp",
            GeneratorConfig::Range { .. } => "range",
            GeneratorConfig::Normalize { .. } => "normalize",
            GeneratorConfig::Invert { .. } => "invert",
            GeneratorConfig::AddScalar { .. } => "add_scalar",
            GeneratorConfig::SubtractScalar { .. } => "subtract_scalar",
            GeneratorConfig::MultiplyScalar { .. } => "multiply_scalar",
            GeneratorConfig::Sigmoid { .. } => "sigmoid",
            GeneratorConfig::Add { .. } => "add",
            GeneratorConfig::Subtract { .. } => "subtract",
            GeneratorConfig::Multiply { .. } => "multiply",
            GeneratorConfig::WithSeed { .. } => "with_seed",
            GeneratorConfig::SeedOffset { .. } => "seed_offset",
            GeneratorConfig::KernelFilter { .. } => "kernel_filter",
        }
    }

    /// Build the described tree as a `D`-dimensional generator.
    pub fn build<const D: usize>(&self) -> Result<BoxedNoise<D>> {
        let tree = self.build_node::<D>()?;
        debug!("built {D}D `{}` tree, bounds [{}, {}]", self.name(), tree.min(), tree.max());
        Ok(tree)
    }

    fn build_node<const D: usize>(&self) -> Result<BoxedNoise<D>> {
        use GeneratorConfig as C;
        Ok(match self {
            C::Basis { kind, seed } => kind.build::<D>(*seed),
            C::Constant { value } => Constant::<D>::new(*value).boxed(),
            C::Perlin { seed } => {
                if D > 4 {
                    return Err(NoiseError::invalid("perlin", format!("perlin noise supports up to 4 axes, not {D}")));
                }
                NoiseFnSource::<_, D>::new(AnyPerlin(noise::Perlin::new(*seed)), -1.0, 1.0).boxed()
            }
            C::Fbm { kind, seed, octaves, lacunarity, gain } => {
                let (kind, seed) = (*kind, *seed);
                fbm(*octaves, *lacunarity, *gain, |i| kind.build::<D>(seed.wrapping_add(i as Seed)))?
            }

            C::Scale { source, scale } => source.build_node::<D>()?.scale(per_axis("scale", scale)?).boxed(),
            C::Shift { source, offset } => source.build_node::<D>()?.shift(per_axis("offset", offset)?).boxed(),

            C::Clamp { source, min, max } => source.build_node::<D>()?.clamp(*min, *max).boxed(),
            C::Range { source, min, max } => source.build_node::<D>()?.set_range(*min, *max).boxed(),
            C::Normalize { source } => source.build_node::<D>()?.normalize().boxed(),
            C::Invert { source } => source.build_node::<D>()?.invert().boxed(),
            C::AddScalar { source, value } => source.build_node::<D>()?.add_scalar(*value).boxed(),
            C::SubtractScalar { source, value } => source.build_node::<D>()?.subtract_scalar(*value).boxed(),
            C::MultiplyScalar { source, value } => source.build_node::<D>()?.multiply_scalar(*value).boxed(),
            C::Sigmoid { source, gradient, power } => source.build_node::<D>()?.sigmoid(*gradient, *power)?.boxed(),

            C::Add { sources } => {
                let (first, rest) = Self::split_sources::<D>("add", sources)?;
                first.add_all(rest)
            }
            C::Subtract { left, right } => left.build_node::<D>()?.subtract(right.build_node::<D>()?).boxed(),
            C::Multiply { sources } => {
                let (first, rest) = Self::split_sources::<D>("multiply", sources)?;
                first.multiply_all(rest)
            }

            C::WithSeed { source, seed } => source.build_node::<D>()?.with_seed(*seed).boxed(),
            C::SeedOffset { source, offset } => {
                let offset = *offset;
                source.build_node::<D>()?.with_seed_fn(move |s| s.wrapping_add(offset)).boxed()
            }

            C::KernelFilter { source, kernel } => source.build_node::<D>()?.kernel_filter(kernel.build::<D>()?).boxed(),
        })
    }

    fn split_sources<const D: usize>(
        name: &'static str,
        sources: &[GeneratorConfig],
    ) -> Result<(BoxedNoise<D>, Vec<BoxedNoise<D>>)> {
        let mut built = sources.iter().map(|s| s.build_node::<D>()).collect::<Result<Vec<_>>>()?;
        if built.is_empty() {
            return Err(NoiseError::invalid(name, "needs at least one source"));
        }
        let first = built.remove(0);
        Ok((first, built))
    }
}

/// `noise::Perlin` evaluated in any dimension up to four; missing axes read 0.
struct AnyPerlin(noise::Perlin);

impl<const D: usize> NoiseFn<f64, D> for AnyPerlin {
    fn get(&self, point: [f64; D]) -> f64 {
        let axis = |k: usize| point.get(k).copied().unwrap_or(0.0);
        match D {
            0..=2 => self.0.get([axis(0), axis(1)]),
            3 => self.0.get([axis(0), axis(1), axis(2)]),
            _ => self.0.get([axis(0), axis(1), axis(2), axis(3)]),
        }
    }
}

// ── Per-axis vectors ─────────────────────────────────────────────────────────

/// Exactly `D` entries, or one entry repeated on every axis.
fn per_axis<T: Copy, const D: usize>(name: &'static str, values: &[T]) -> Result<[T; D]> {
    match values {
        [single] => Ok([*single; D]),
        _ => exact(name, values),
    }
}

fn exact<T: Copy, const D: usize>(name: &'static str, values: &[T]) -> Result<[T; D]> {
    <[T; D]>::try_from(values)
        .map_err(|_| NoiseError::invalid(name, format!("expected {D} entries, found {}", values.len())))
}

fn planar<const D: usize>(name: &'static str, kernel: Kernel<2>) -> Result<Kernel<D>> {
    Kernel::new(exact(name, &kernel.dims())?, kernel.weights().to_vec(), kernel.divisor())
}
