use crate::{activation::activation::ActivationFunction, layers::dense::Layer, math::matrix::Matrix};
use crate::error::{InferenceError, Result};
use crate::network::metadata::ModelMetadata;
use crate::tensor::Shape;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a network from `(weights, biases, activation)` triples.
    pub fn new(layer_specs: Vec<(Matrix, Matrix, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(weights, biases, activation)| Layer::new(weights, biases, activation))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    /// Forward pass. Takes `&self`: nothing is cached between calls.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Number of inputs the first layer consumes (0 for an empty network).
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    /// Number of outputs the last layer produces (0 for an empty network).
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Checks every layer and that each layer consumes what the previous
    /// one produces.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(InferenceError::ShapeMismatch {
                expected: Shape::new(vec![1]),
                actual:   Shape::new(vec![0]),
            });
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        for pair in self.layers.windows(2) {
            if pair[1].input_size() != pair[0].size {
                return Err(InferenceError::ShapeMismatch {
                    expected: Shape::new(vec![1, pair[0].size]),
                    actual:   Shape::new(vec![1, pair[1].input_size()]),
                });
            }
        }
        Ok(())
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer() -> Network {
        Network::new(vec![
            (Matrix::from_data(vec![vec![1.0, -1.0], vec![1.0, 0.0]]), Matrix::row(&[0.0, 0.0]), ActivationFunction::ReLU),
            (Matrix::from_data(vec![vec![1.0], vec![2.0]]), Matrix::row(&[0.5]), ActivationFunction::Identity),
        ])
    }

    #[test]
    fn forward_chains_layers() {
        // relu([3, -1]) = [3, 0] -> 3*1 + 0*2 + 0.5
        let out = two_layer().forward(&[1.0, 2.0]);
        assert_eq!(out, vec![3.5]);
    }

    #[test]
    fn sizes_come_from_first_and_last_layer() {
        let net = two_layer();
        assert_eq!(net.input_size(), 2);
        assert_eq!(net.output_size(), 1);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn broken_chain_fails_validation() {
        let net = Network::new(vec![
            (Matrix::zeros(2, 3), Matrix::zeros(1, 3), ActivationFunction::ReLU),
            (Matrix::zeros(4, 1), Matrix::zeros(1, 1), ActivationFunction::Identity),
        ]);
        match net.validate() {
            Err(InferenceError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, Shape::new(vec![1, 3]));
                assert_eq!(actual, Shape::new(vec![1, 4]));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_network_fails_validation() {
        assert!(Network::new(vec![]).validate().is_err());
    }

    #[test]
    fn json_round_trip_keeps_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        let path = path.to_str().unwrap();

        let net = two_layer();
        net.save_json(path).unwrap();
        let loaded = Network::load_json(path).unwrap();
        assert_eq!(loaded.forward(&[0.25, 0.75]), net.forward(&[0.25, 0.75]));
    }

    #[test]
    fn model_without_metadata_deserializes() {
        let json = r#"{"layers":[{"size":1,"weights":{"rows":1,"cols":1,"data":[[2.0]]},
            "biases":{"rows":1,"cols":1,"data":[[0.0]]},"activator":"Identity"}]}"#;
        let net: Network = serde_json::from_str(json).unwrap();
        assert!(net.metadata.is_none());
        assert_eq!(net.forward(&[1.5]), vec![3.0]);
    }
}
