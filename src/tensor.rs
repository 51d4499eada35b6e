//! Fixed-shape model input.
//!
//! The classifier consumes exactly one 28×28 single-channel image per call,
//! laid out as `(batch, height, width, channels)` in row-major order with
//! every value in `[0.0, 1.0]`.

use std::fmt;

use crate::error::{InferenceError, Result};

pub const INPUT_HEIGHT:   usize = 28;
pub const INPUT_WIDTH:    usize = 28;
pub const INPUT_CHANNELS: usize = 1;
/// Number of output classes (digits 0-9).
pub const NUM_CLASSES:    usize = 10;

/// A tensor shape, displayed as `(1, 28, 28, 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// `(1, 28, 28, 1)`: the input shape of the digit classifier.
    pub fn model_input() -> Self {
        Shape(vec![1, INPUT_HEIGHT, INPUT_WIDTH, INPUT_CHANNELS])
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Total number of elements.
    pub fn volume(&self) -> usize {
        self.0.iter().product()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "({})", dims.join(", "))
    }
}

/// Row-major `f32` tensor whose values all lie in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    shape: Shape,
    data:  Vec<f32>,
}

impl NormalizedTensor {
    /// Wraps raw values, checking that `data` fills `shape` exactly and
    /// that every value is within `[0.0, 1.0]` (NaN is rejected).
    pub fn new(shape: Shape, data: Vec<f32>) -> Result<Self> {
        if shape.volume() != data.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: shape,
                actual:   Shape::new(vec![data.len()]),
            });
        }
        if let Some((index, &value)) = data.iter().enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(InferenceError::InvalidTensor { index, value });
        }
        Ok(NormalizedTensor { shape, data })
    }

    /// Builds a `(1, 28, 28, 1)` tensor from 784 row-major 8-bit intensities,
    /// dividing each by 255.0.
    pub fn from_intensities(pixels: &[u8]) -> Result<Self> {
        let data = pixels.iter().map(|&p| p as f32 / 255.0).collect();
        NormalizedTensor::new(Shape::model_input(), data)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Value at `(batch, row, col, channel)`; `None` when out of bounds or
    /// when the tensor is not 4-dimensional.
    pub fn get(&self, b: usize, y: usize, x: usize, c: usize) -> Option<f32> {
        let [nb, h, w, nc] = <[usize; 4]>::try_from(self.shape.dims()).ok()?;
        if b >= nb || y >= h || x >= w || c >= nc {
            return None;
        }
        self.data.get(((b * h + y) * w + x) * nc + c).copied()
    }
}
