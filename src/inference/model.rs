use std::fmt;

use tracing::info;

use crate::error::{InferenceError, Result};
use crate::inference::scorer::Scorer;
use crate::network::{InputType, Network};
use crate::tensor::{Shape, INPUT_HEIGHT, INPUT_WIDTH, NUM_CLASSES};

/// Owned, immutable handle to a loaded classifier.
///
/// Built once at startup and then only read, so it can be shared across
/// request threads behind an `Arc`.
pub struct ModelHandle {
    scorer: Box<dyn Scorer>,
    source: String,
}

impl ModelHandle {
    /// Wraps an already constructed scorer. `source` is a label for logs.
    pub fn from_scorer(scorer: impl Scorer + 'static, source: impl Into<String>) -> Self {
        ModelHandle { scorer: Box::new(scorer), source: source.into() }
    }

    /// Loads a ferrite-nn JSON model and checks it fits the digit contract:
    /// 784 inputs, 10 outputs, consistent layers, and (when declared) a
    /// 28×28 grayscale input type.
    pub fn load(path: &str) -> Result<Self> {
        let network = Network::load_json(path).map_err(|e| InferenceError::ModelLoad {
            path:   path.to_owned(),
            reason: e.to_string(),
        })?;
        check_digit_network(&network)?;
        info!(path, layers = network.layers.len(), "model loaded");
        Ok(ModelHandle::from_scorer(network, path))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("source", &self.source)
            .field("input_shape", &self.scorer.input_shape())
            .finish()
    }
}

fn check_digit_network(network: &Network) -> Result<()> {
    network.validate()?;

    let input = Shape::model_input();
    if network.input_size() != input.volume() {
        return Err(InferenceError::ShapeMismatch {
            expected: input,
            actual:   Shape::new(vec![1, network.input_size()]),
        });
    }
    if network.output_size() != NUM_CLASSES {
        return Err(InferenceError::ShapeMismatch {
            expected: Shape::new(vec![1, NUM_CLASSES]),
            actual:   Shape::new(vec![1, network.output_size()]),
        });
    }

    match network.metadata.as_ref().and_then(|m| m.input_type.as_ref()) {
        None | Some(InputType::Numeric) => Ok(()),
        Some(InputType::ImageGrayscale { width, height })
            if (*width as usize, *height as usize) == (INPUT_WIDTH, INPUT_HEIGHT) => Ok(()),
        Some(InputType::ImageGrayscale { width, height }) => Err(InferenceError::ShapeMismatch {
            expected: input,
            actual:   Shape::new(vec![1, *height as usize, *width as usize, 1]),
        }),
        Some(InputType::ImageRgb { width, height }) => Err(InferenceError::ShapeMismatch {
            expected: input,
            actual:   Shape::new(vec![1, *height as usize, *width as usize, 3]),
        }),
    }
}
