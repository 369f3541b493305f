use std::ops::{Index, IndexMut};

use crate::region::{strides, Indices};

/// A dense grid of samples returned by one query.
///
/// Values are stored with the last axis fastest, so a 2D chunk is a sequence
/// of columns: `data[x * height + y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<const D: usize> {
    dims: [usize; D],
    data: Vec<f64>,
}

impl<const D: usize> Chunk<D> {
    /// A chunk of the given shape filled with `fill`.
    pub fn filled(dims: [usize; D], fill: f64) -> Self {
        Self { dims, data: vec![fill; dims.iter().product()] }
    }

    /// Wrap an existing buffer. Returns `None` when the length does not match.
    pub fn from_vec(dims: [usize; D], data: Vec<f64>) -> Option<Self> {
        (data.len() == dims.iter().product::<usize>()).then_some(Self { dims, data })
    }

    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat offset of `index`, or `None` when out of bounds.
    pub fn offset(&self, index: [usize; D]) -> Option<usize> {
        let strides = strides(self.dims);
        let mut flat = 0;
        for k in 0..D {
            if index[k] >= self.dims[k] {
                return None;
            }
            flat += index[k] * strides[k];
        }
        Some(flat)
    }

    pub fn get(&self, index: [usize; D]) -> Option<f64> {
        self.offset(index).map(|i| self.data[i])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Every multi-index in storage order.
    pub fn indices(&self) -> Indices<D> {
        Indices::new(self.dims)
    }

    /// Apply `f` to every sample in place.
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Smallest sample, `+inf` for an empty chunk.
    pub fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample, `-inf` for an empty chunk.
    pub fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Chunk<2> {
    pub fn width(&self) -> usize {
        self.dims[0]
    }

    pub fn height(&self) -> usize {
        self.dims[1]
    }

    /// Column-nested copy, `columns[x][y]`.
    pub fn to_columns(&self) -> Vec<Vec<f64>> {
        if self.dims[1] == 0 {
            return vec![Vec::new(); self.dims[0]];
        }
        self.data.chunks(self.dims[1]).map(<[f64]>::to_vec).collect()
    }
}

impl<const D: usize> Index<[usize; D]> for Chunk<D> {
    type Output = f64;

    fn index(&self, index: [usize; D]) -> &f64 {
        match self.offset(index) {
            Some(i) => &self.data[i],
            None => panic!("chunk index {index:?} out of bounds for shape {:?}", self.dims),
        }
    }
}

impl<const D: usize> IndexMut<[usize; D]> for Chunk<D> {
    fn index_mut(&mut self, index: [usize; D]) -> &mut f64 {
        match self.offset(index) {
            Some(i) => &mut self.data[i],
            None => panic!("chunk index {index:?} out of bounds for shape {:?}", self.dims),
        }
    }
}
