use std::sync::Mutex;

use crate::error::{InferenceError, Result};
use crate::network::Network;
use crate::tensor::{NormalizedTensor, Shape};

/// A loaded classifier: maps a normalized tensor to one score per class.
///
/// Implementations must be safe to call from several request threads at
/// once through `&self`. Models that need exclusive access go through
/// `Serialized` instead.
pub trait Scorer: Send + Sync {
    /// The tensor shape `score` accepts.
    fn input_shape(&self) -> Shape;

    fn score(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>>;
}

impl Scorer for Network {
    /// `(1, 28, 28, 1)` for a 784-input network, `(1, n)` otherwise.
    fn input_shape(&self) -> Shape {
        let n = self.input_size();
        if n == Shape::model_input().volume() {
            Shape::model_input()
        } else {
            Shape::new(vec![1, n])
        }
    }

    /// Re-validates the layer chain; a network built by hand and passed to
    /// `ModelHandle::from_scorer` has not been through `load`.
    fn score(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>> {
        self.validate()?;
        if tensor.shape().volume() != self.input_size() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.input_shape(),
                actual:   tensor.shape().clone(),
            });
        }
        let input: Vec<f64> = tensor.as_slice().iter().map(|&v| v as f64).collect();
        Ok(self.forward(&input).into_iter().map(|v| v as f32).collect())
    }
}

/// A scorer that needs `&mut self`, e.g. one that keeps scratch buffers.
pub trait ScoreMut: Send {
    fn input_shape(&self) -> Shape;

    fn score_mut(&mut self, tensor: &NormalizedTensor) -> Result<Vec<f32>>;
}

/// Puts a `ScoreMut` behind a mutex so it can be shared like any `Scorer`.
/// Only the scoring call is serialized; preprocessing stays parallel.
pub struct Serialized<S> {
    inner: Mutex<S>,
    shape: Shape,
}

impl<S: ScoreMut> Serialized<S> {
    pub fn new(inner: S) -> Self {
        let shape = inner.input_shape();
        Serialized { inner: Mutex::new(inner), shape }
    }
}

impl<S: ScoreMut> Scorer for Serialized<S> {
    fn input_shape(&self) -> Shape {
        self.shape.clone()
    }

    fn score(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>> {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.score_mut(tensor)
    }
}
