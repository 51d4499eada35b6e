use std::sync::OnceLock;

use tracing::debug;

use crate::error::{InferenceError, Result};
use crate::inference::model::ModelHandle;
use crate::inference::prediction::PredictionResult;
use crate::tensor::{NormalizedTensor, Shape, NUM_CLASSES};

/// Runs the loaded model and reduces its scores to a digit.
///
/// The service starts either ready (`ready`) or empty (`new`); an empty
/// service answers every `predict` with `ModelNotReady` until a model is
/// installed. A model can be installed once and is never replaced.
#[derive(Debug, Default)]
pub struct PredictionService {
    model: OnceLock<ModelHandle>,
}

impl PredictionService {
    pub fn new() -> Self {
        PredictionService { model: OnceLock::new() }
    }

    pub fn ready(model: ModelHandle) -> Self {
        let service = PredictionService::new();
        // Freshly created, so the cell is empty.
        let _ = service.model.set(model);
        service
    }

    /// Installs the model; fails with `AlreadyLoaded` on a second call.
    pub fn install(&self, model: ModelHandle) -> Result<()> {
        self.model.set(model).map_err(|_| InferenceError::AlreadyLoaded)
    }

    pub fn is_ready(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.get()
    }

    pub fn predict(&self, tensor: &NormalizedTensor) -> Result<PredictionResult> {
        let model = self.model.get().ok_or(InferenceError::ModelNotReady)?;
        let scorer = model.scorer();

        let expected = scorer.input_shape();
        if tensor.shape() != &expected {
            return Err(InferenceError::ShapeMismatch {
                expected,
                actual: tensor.shape().clone(),
            });
        }

        let scores = scorer.score(tensor)?;
        if scores.len() != NUM_CLASSES {
            return Err(InferenceError::ShapeMismatch {
                expected: Shape::new(vec![1, NUM_CLASSES]),
                actual:   Shape::new(vec![1, scores.len()]),
            });
        }

        let result = PredictionResult::from_scores(scores);
        debug!(prediction = result.prediction, model = model.source(), "scored tensor");
        Ok(result)
    }
}
