use thiserror::Error;

use crate::tensor::Shape;

/// Everything that can go wrong between receiving an encoded image and
/// returning a digit. Every variant is terminal for the request that hit it.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("could not decode payload: {0}")]
    Decode(String),

    #[error("payload is not a decodable raster image: {0}")]
    ImageFormat(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    #[error("model is not loaded yet")]
    ModelNotReady,

    #[error("tensor value {value} at index {index} is outside [0, 1]")]
    InvalidTensor { index: usize, value: f32 },

    #[error("could not load model from '{path}': {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("a model is already installed")]
    AlreadyLoaded,
}

impl InferenceError {
    /// Stable identifier for the error kind, used by the HTTP layer in
    /// response bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::Decode(_)               => "decode_error",
            InferenceError::ImageFormat(_)          => "image_format_error",
            InferenceError::ShapeMismatch { .. }    => "shape_mismatch_error",
            InferenceError::ModelNotReady           => "model_not_ready_error",
            InferenceError::InvalidTensor { .. }    => "invalid_tensor_error",
            InferenceError::ModelLoad { .. }        => "model_load_error",
            InferenceError::AlreadyLoaded           => "already_loaded_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, InferenceError>;
