//! Composable lattice noise.
//!
//! Leaves hash integer lattice points to values in `[0, 1]` and interpolate
//! between them ([`basis`]); combinators transform, mix, filter and reseed
//! whole trees ([`combinators`]). Every generator answers chunk queries over
//! a regular grid and declares the bounds of everything it can return.
//!
//! ```
//! use lattice_core::prelude::*;
//!
//! let terrain = BicubicNoise::new(3424)
//!     .scale_uniform(50.0)
//!     .normalize()
//!     .sigmoid(4.0, 4.0)?
//!     .kernel_filter(gaussian5());
//! let chunk = terrain.get_chunk_unit([0.0, 0.0], [64, 64])?;
//! assert_eq!(chunk.dims(), [64, 64]);
//! # Ok::<(), lattice_core::NoiseError>(())
//! ```

pub mod basis;
pub mod chunk;
pub mod combinators;
pub mod config;
pub mod error;
pub mod generator;
pub mod hash;
pub mod interpolate;
pub mod kernel;
pub mod region;
pub mod sampler;

#[cfg(test)]
mod test_support;

pub use chunk::Chunk;
pub use config::{BasisKind, GeneratorConfig, KernelConfig};
pub use error::{NoiseError, Result};
pub use generator::{Bounds, BoxedNoise, NoiseGenerator, Seed, SharedNoise};
pub use kernel::Kernel;
pub use region::Region;

/// Everything needed to build and query generator trees.
pub mod prelude {
    pub use crate::basis::{
        BesselNoise, BicubicNoise, BilinearNoise, Constant, CosineNoise, CubicNoise, LatticeNoise, LinearNoise,
        MonotoneCubicNoise, NearestNoise, NoiseFnSource, SmootherstepNoise, TricubicNoise, TrilinearNoise,
    };
    pub use crate::combinators::fractal::fbm;
    pub use crate::combinators::NoiseExt;
    pub use crate::kernel::presets::{box_filter, gaussian3, gaussian5};
    pub use crate::{Bounds, BoxedNoise, Chunk, GeneratorConfig, Kernel, NoiseError, NoiseGenerator, Region, Seed};
}
