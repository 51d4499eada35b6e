#![allow(dead_code)]

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

use ferrite_digits::{ActivationFunction, Matrix, Network};

/// A stroke as `(x0, x1, y0, y1)` in fractions of width/height.
pub type Stroke = (f32, f32, f32, f32);

/// A block-letter "4": upper-left vertical, crossbar, full right vertical.
pub const FOUR: &[Stroke] = &[
    (0.20, 0.32, 0.10, 0.58),
    (0.20, 0.82, 0.50, 0.62),
    (0.60, 0.72, 0.10, 0.90),
];

/// A block-letter "0": rectangular ring.
pub const ZERO: &[Stroke] = &[
    (0.20, 0.32, 0.10, 0.90),
    (0.68, 0.80, 0.10, 0.90),
    (0.20, 0.80, 0.10, 0.22),
    (0.20, 0.80, 0.78, 0.90),
];

fn covers(strokes: &[Stroke], fx: f32, fy: f32) -> bool {
    strokes.iter().any(|&(x0, x1, y0, y1)| fx >= x0 && fx < x1 && fy >= y0 && fy < y1)
}

/// White strokes on black, like a canvas drawing.
pub fn draw(strokes: &[Stroke], width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = (x as f32 + 0.5) / width as f32;
        let fy = (y as f32 + 0.5) / height as f32;
        if covers(strokes, fx, fy) { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
    })
}

pub fn encode(image: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn png(image: &DynamicImage) -> Vec<u8> {
    encode(image, ImageOutputFormat::Png)
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// One-layer 784 → 10 template matcher. A class with strokes scores the
/// mean intensity on its template minus the mean intensity off it; classes
/// without strokes always score 0 before the softmax.
pub fn template_network(templates: &[(usize, &[Stroke])]) -> Network {
    let mut weights = Matrix::zeros(784, 10);
    for &(class, strokes) in templates {
        let on: Vec<bool> = (0..784).map(|i| {
            let (x, y) = (i % 28, i / 28);
            covers(strokes, (x as f32 + 0.5) / 28.0, (y as f32 + 0.5) / 28.0)
        }).collect();
        let n_on = on.iter().filter(|&&b| b).count() as f64;
        let n_off = 784.0 - n_on;
        for (i, &is_on) in on.iter().enumerate() {
            weights.data[i][class] = if is_on { 1.0 / n_on } else { -1.0 / n_off };
        }
    }
    Network::new(vec![(weights, Matrix::zeros(1, 10), ActivationFunction::Softmax)])
}
