pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod tensor;
pub mod error;
pub mod preprocess;
pub mod inference;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{InputType, ModelMetadata, Network};
pub use tensor::{NormalizedTensor, Shape};
pub use error::{InferenceError, Result};
pub use preprocess::{normalize, EncodedImage, Encoding, Normalizer, NormalizerOptions};
pub use inference::{argmax, ModelHandle, PredictionResult, PredictionService, ScoreMut, Scorer, Serialized};
pub use pipeline::DigitPipeline;
