use tracing::debug;

use crate::error::Result;
use crate::inference::{PredictionResult, PredictionService};
use crate::preprocess::{EncodedImage, Normalizer};

/// Normalizer followed by prediction service: one call per request.
///
/// Preprocessing runs without any locking; only the scorer decides
/// whether model invocations are serialized.
#[derive(Debug, Default)]
pub struct DigitPipeline {
    normalizer: Normalizer,
    service:    PredictionService,
}

impl DigitPipeline {
    pub fn new(normalizer: Normalizer, service: PredictionService) -> Self {
        DigitPipeline { normalizer, service }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }

    pub fn classify(&self, payload: &EncodedImage) -> Result<PredictionResult> {
        let tensor = self.normalizer.normalize(payload)?;
        debug!(shape = %tensor.shape(), "normalized payload");
        self.service.predict(&tensor)
    }
}
