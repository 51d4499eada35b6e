mod common;

use std::sync::Arc;

use image::DynamicImage;

use ferrite_digits::{
    normalize, DigitPipeline, EncodedImage, InferenceError, ModelHandle, NormalizedTensor, Normalizer,
    PredictionService, Scorer, Shape,
};

use common::{data_uri, draw, png, template_network, FOUR, ZERO};

fn four_payload() -> EncodedImage {
    // 100 wide, 150 tall, RGB.
    let image = DynamicImage::ImageRgb8(draw(FOUR, 100, 150));
    let uri = data_uri(&png(&image));
    assert!(uri.starts_with("data:image/png;base64,"));
    EncodedImage::data_uri(uri)
}

fn saved_model(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("digits.json").to_str().unwrap().to_owned();
    template_network(&[(0, ZERO), (4, FOUR)]).save_json(&path).unwrap();
    path
}

#[test]
fn handwritten_four_is_predicted_as_four() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelHandle::load(&saved_model(&dir)).unwrap();
    let pipeline = DigitPipeline::new(Normalizer::default(), PredictionService::ready(model));

    let payload = four_payload();
    let tensor = normalize(&payload).unwrap();
    assert_eq!(tensor.shape(), &Shape::model_input());

    let result = pipeline.classify(&payload).unwrap();
    assert_eq!(result.prediction, 4);
    assert_eq!(result.scores.len(), 10);
    assert_eq!(serde_json::to_value(&result).unwrap(), serde_json::json!({ "prediction": 4 }));
}

#[test]
fn zero_is_not_mistaken_for_four() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelHandle::load(&saved_model(&dir)).unwrap();
    let service = PredictionService::ready(model);

    let image = DynamicImage::ImageRgb8(draw(ZERO, 120, 120));
    let tensor = normalize(&EncodedImage::data_uri(data_uri(&png(&image)))).unwrap();
    assert_eq!(service.predict(&tensor).unwrap().prediction, 0);
}

#[test]
fn predict_before_load_is_not_ready() {
    let pipeline = DigitPipeline::new(Normalizer::default(), PredictionService::new());
    let err = pipeline.classify(&four_payload()).unwrap_err();
    assert!(matches!(err, InferenceError::ModelNotReady));

    let dir = tempfile::tempdir().unwrap();
    pipeline.service().install(ModelHandle::load(&saved_model(&dir)).unwrap()).unwrap();
    assert_eq!(pipeline.classify(&four_payload()).unwrap().prediction, 4);
}

struct Tied;

impl Scorer for Tied {
    fn input_shape(&self) -> Shape {
        Shape::model_input()
    }

    fn score(&self, _tensor: &NormalizedTensor) -> ferrite_digits::Result<Vec<f32>> {
        Ok(vec![0.01, 0.02, 0.03, 0.4, 0.0, 0.0, 0.0, 0.4, 0.1, 0.04])
    }
}

#[test]
fn tied_scores_pick_lower_index() {
    let service = PredictionService::ready(ModelHandle::from_scorer(Tied, "tied"));
    let tensor = normalize(&four_payload()).unwrap();
    assert_eq!(service.predict(&tensor).unwrap().prediction, 3);
}

#[test]
fn concurrent_requests_agree() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelHandle::load(&saved_model(&dir)).unwrap();
    let pipeline = Arc::new(DigitPipeline::new(Normalizer::default(), PredictionService::ready(model)));
    let payload = Arc::new(four_payload());

    let handles: Vec<_> = (0..8).map(|_| {
        let pipeline = pipeline.clone();
        let payload = payload.clone();
        std::thread::spawn(move || pipeline.classify(&payload).unwrap().prediction)
    }).collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), 4);
    }
}

#[test]
fn model_with_wrong_input_size_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.json").to_str().unwrap().to_owned();
    ferrite_digits::Network::new(vec![(
        ferrite_digits::Matrix::zeros(64, 10),
        ferrite_digits::Matrix::zeros(1, 10),
        ferrite_digits::ActivationFunction::Softmax,
    )])
    .save_json(&path)
    .unwrap();

    match ModelHandle::load(&path).unwrap_err() {
        InferenceError::ShapeMismatch { expected, actual } => {
            assert_eq!(expected.to_string(), "(1, 28, 28, 1)");
            assert_eq!(actual.to_string(), "(1, 64)");
        }
        other => panic!("unexpected error: {other}"),
    }
}
