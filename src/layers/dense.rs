use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};
use crate::error::{InferenceError, Result};
use crate::tensor::Shape;

/// A fully connected layer: `a = activator(x · W + b)`.
///
/// `weights` is `input × size`, `biases` is `1 × size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    pub fn new(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        Layer {
            size: weights.cols,
            weights,
            biases,
            activator: activation
        }
    }

    /// Number of values this layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Pure forward pass; the layer is never mutated, so a loaded model can
    /// be shared between threads without locking.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let z = &Matrix::row(input) * &self.weights + self.biases.clone();
        self.activator.apply(&z.data[0])
    }

    /// Verifies that `weights`, `biases` and `size` describe the same layer.
    pub fn validate(&self) -> Result<()> {
        self.weights.check_consistent()?;
        self.biases.check_consistent()?;
        if self.weights.cols != self.size {
            return Err(InferenceError::ShapeMismatch {
                expected: Shape::new(vec![self.weights.rows, self.size]),
                actual:   Shape::new(vec![self.weights.rows, self.weights.cols]),
            });
        }
        if self.biases.rows != 1 || self.biases.cols != self.size {
            return Err(InferenceError::ShapeMismatch {
                expected: Shape::new(vec![1, self.size]),
                actual:   Shape::new(vec![self.biases.rows, self.biases.cols]),
            });
        }
        Ok(())
    }
}
