use serde::Serialize;

/// The answer for one request.
///
/// Serializes as `{"prediction": n}`; the score vector stays on the Rust
/// side and is not part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: u8,
    #[serde(skip)]
    pub scores: Vec<f32>,
}

impl PredictionResult {
    /// Reduces a score vector to its winning class.
    pub fn from_scores(scores: Vec<f32>) -> Self {
        let prediction = argmax(&scores) as u8;
        PredictionResult { prediction, scores }
    }
}

/// Index of the largest score. Ties go to the lowest index, NaN never
/// wins, and an empty or all-NaN vector yields 0.
///
/// Unlike NumPy's `argmax`, which returns the first NaN it meets, NaN
/// entries are skipped here.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map_or(0, |(i, _)| i)
}
