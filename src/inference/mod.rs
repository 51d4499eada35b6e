pub mod model;
pub mod prediction;
pub mod scorer;
pub mod service;

pub use model::ModelHandle;
pub use prediction::{argmax, PredictionResult};
pub use scorer::{ScoreMut, Scorer, Serialized};
pub use service::PredictionService;
