//! Query regions and dense multi-index iteration.

/// A rectangular (or box) grid of sample positions.
///
/// Sample `i` along axis `k` sits at `origin[k] + i * step_size[k]`. Step
/// sizes may be negative, which walks the axis backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region<const D: usize> {
    pub origin: [f64; D],
    pub steps: [usize; D],
    pub step_size: [f64; D],
}

impl<const D: usize> Region<D> {
    pub fn new(origin: [f64; D], steps: [usize; D], step_size: [f64; D]) -> Self {
        Self { origin, steps, step_size }
    }

    /// Same step size on every axis.
    pub fn uniform(origin: [f64; D], steps: [usize; D], step_size: f64) -> Self {
        Self::new(origin, steps, [step_size; D])
    }

    /// Unit steps on every axis.
    pub fn unit(origin: [f64; D], steps: [usize; D]) -> Self {
        Self::uniform(origin, steps, 1.0)
    }

    /// A single sample at `point`.
    pub fn point(point: [f64; D]) -> Self {
        Self::unit(point, [1; D])
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.steps.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate of sample `index` along `axis`.
    #[inline]
    pub fn position(&self, axis: usize, index: usize) -> f64 {
        self.origin[axis] + index as f64 * self.step_size[axis]
    }

    /// The same grid moved by `offset`.
    pub fn translated(&self, offset: [f64; D]) -> Self {
        let mut origin = self.origin;
        for (o, d) in origin.iter_mut().zip(offset) {
            *o += d;
        }
        Self { origin, ..*self }
    }

    /// The same grid seen through a zoom of `factors`: every coordinate and
    /// step divided per axis.
    pub fn zoomed(&self, factors: [f64; D]) -> Self {
        let mut origin = self.origin;
        let mut step_size = self.step_size;
        for k in 0..D {
            origin[k] /= factors[k];
            step_size[k] /= factors[k];
        }
        Self { origin, steps: self.steps, step_size }
    }

    /// Grow the grid by `before[k]` samples on the low side of each axis and
    /// `before[k] + after[k]` samples in total, keeping the step sizes.
    pub fn padded(&self, before: [usize; D], after: [usize; D]) -> Self {
        let mut origin = self.origin;
        let mut steps = self.steps;
        for k in 0..D {
            origin[k] -= before[k] as f64 * self.step_size[k];
            steps[k] += before[k] + after[k];
        }
        Self { origin, steps, step_size: self.step_size }
    }
}

/// Row-major strides for `dims` (last axis fastest).
pub(crate) fn strides<const D: usize>(dims: [usize; D]) -> [usize; D] {
    let mut strides = [1usize; D];
    for k in (0..D.saturating_sub(1)).rev() {
        strides[k] = strides[k + 1] * dims[k + 1];
    }
    strides
}

/// Iterates every multi-index of a `dims`-shaped grid, last axis fastest.
#[derive(Debug, Clone)]
pub struct Indices<const D: usize> {
    dims: [usize; D],
    next: Option<[usize; D]>,
}

impl<const D: usize> Indices<D> {
    pub fn new(dims: [usize; D]) -> Self {
        let empty = dims.iter().any(|&d| d == 0);
        Self { dims, next: if empty { None } else { Some([0; D]) } }
    }
}

impl<const D: usize> Iterator for Indices<D> {
    type Item = [usize; D];

    fn next(&mut self) -> Option<[usize; D]> {
        let current = self.next?;
        let mut advanced = current;
        let mut axis = D;
        self.next = loop {
            if axis == 0 {
                break None;
            }
            axis -= 1;
            advanced[axis] += 1;
            if advanced[axis] < self.dims[axis] {
                break Some(advanced);
            }
            advanced[axis] = 0;
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_walk_last_axis_fastest() {
        let all: Vec<[usize; 2]> = Indices::new([2, 3]).collect();
        assert_eq!(all, vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]);
    }

    #[test]
    fn empty_axis_yields_nothing() {
        assert_eq!(Indices::new([4, 0, 2]).count(), 0);
    }

    #[test]
    fn strides_match_shape() {
        assert_eq!(strides([4, 3, 2]), [6, 2, 1]);
        assert_eq!(strides([5]), [1]);
    }

    #[test]
    fn padding_moves_origin_by_whole_steps() {
        let r = Region::new([10.0, 0.0], [4, 4], [0.5, -2.0]).padded([2, 1], [2, 1]);
        assert_eq!(r.origin, [9.0, 2.0]);
        assert_eq!(r.steps, [8, 6]);
        assert_eq!(r.step_size, [0.5, -2.0]);
    }

    #[test]
    fn zoom_divides_origin_and_steps() {
        let r = Region::new([2.0, 4.0], [3, 3], [1.0, 2.0]).zoomed([2.0, 4.0]);
        assert_eq!(r.origin, [1.0, 1.0]);
        assert_eq!(r.step_size, [0.5, 0.5]);
    }
}
