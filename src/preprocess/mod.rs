pub mod encoded;
pub mod normalizer;

pub use encoded::{EncodedImage, Encoding};
pub use normalizer::{normalize, Normalizer, NormalizerOptions};
