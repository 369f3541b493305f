//! Convolution kernels for [`KernelFilter`](crate::combinators::filter::KernelFilter).

use log::debug;

use crate::error::{NoiseError, Result};
use crate::region::strides;

/// An immutable weight grid plus divisor.
///
/// Weights are stored last axis fastest, so a 2D kernel of `width × height`
/// holds `weights[x * height + y]`. The filtered value is
/// `Σ weight · sample / divisor`; `max` is the factor a constant field is
/// multiplied by, `sum / divisor`.
///
/// A divisor of zero is accepted but produces non-finite output.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel<const D: usize = 2> {
    dims: [usize; D],
    weights: Vec<f64>,
    divisor: f64,
    sum: f64,
}

impl<const D: usize> Kernel<D> {
    pub fn new(dims: [usize; D], weights: Vec<f64>, divisor: f64) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(NoiseError::invalid("dims", format!("axis {axis} of kernel has zero size")));
        }
        let expected: usize = dims.iter().product();
        if weights.len() != expected {
            return Err(NoiseError::invalid(
                "weights",
                format!("{} weights supplied for a {dims:?} kernel ({expected} expected)", weights.len()),
            ));
        }
        Ok(Self::from_parts(dims, weights, divisor))
    }

    fn from_parts(dims: [usize; D], weights: Vec<f64>, divisor: f64) -> Self {
        let sum = weights.iter().sum();
        debug!("kernel {dims:?}: sum {sum}, divisor {divisor}");
        Self { dims, weights, divisor, sum }
    }

    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at `index`, or `None` when out of bounds.
    pub fn weight(&self, index: [usize; D]) -> Option<f64> {
        let strides = strides(self.dims);
        let mut flat = 0;
        for k in 0..D {
            if index[k] >= self.dims[k] {
                return None;
            }
            flat += index[k] * strides[k];
        }
        Some(self.weights[flat])
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn max(&self) -> f64 {
        self.sum / self.divisor
    }
}

impl Kernel<2> {
    /// Build from column-nested weights, `columns[x][y]`.
    pub fn from_columns(columns: Vec<Vec<f64>>, divisor: f64) -> Result<Self> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if let Some(x) = columns.iter().position(|c| c.len() != height) {
            return Err(NoiseError::invalid(
                "weights",
                format!("column {x} has {} weights, column 0 has {height}", columns[x].len()),
            ));
        }
        Self::new([width, height], columns.into_iter().flatten().collect(), divisor)
    }

    pub fn width(&self) -> usize {
        self.dims[0]
    }

    pub fn height(&self) -> usize {
        self.dims[1]
    }
}

/// Common smoothing kernels.
pub mod presets {
    use super::Kernel;
    use crate::error::Result;

    /// 3×3 binomial approximation of a Gaussian, divisor 16.
    pub fn gaussian3() -> Kernel<2> {
        #[rustfmt::skip]
        let weights = vec![
            1.0, 2.0, 1.0,
            2.0, 4.0, 2.0,
            1.0, 2.0, 1.0,
        ];
        Kernel::from_parts([3, 3], weights, 16.0)
    }

    /// 5×5 discrete Gaussian (σ ≈ 1), divisor 273.
    pub fn gaussian5() -> Kernel<2> {
        #[rustfmt::skip]
        let weights = vec![
            1.0,  4.0,  7.0,  4.0, 1.0,
            4.0, 16.0, 26.0, 16.0, 4.0,
            7.0, 26.0, 41.0, 26.0, 7.0,
            4.0, 16.0, 26.0, 16.0, 4.0,
            1.0,  4.0,  7.0,  4.0, 1.0,
        ];
        Kernel::from_parts([5, 5], weights, 273.0)
    }

    /// Uniform mean over `dims`.
    pub fn box_filter<const D: usize>(dims: [usize; D]) -> Result<Kernel<D>> {
        let n: usize = dims.iter().product();
        Kernel::new(dims, vec![1.0; n], n as f64)
    }
}
