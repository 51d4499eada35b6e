//! Image normalization for the digit classifier.
//!
//! Turns any decodable raster image into a `(1, 28, 28, 1)` tensor:
//! decode → parse → luminance → bilinear resize → scale by 1/255.
//! Every step is deterministic, so the same payload always yields a
//! bit-identical tensor.

use image::{imageops::{self, FilterType}, DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use tracing::{debug, warn};

use crate::error::{InferenceError, Result};
use crate::preprocess::encoded::EncodedImage;
use crate::tensor::{NormalizedTensor, INPUT_HEIGHT, INPUT_WIDTH};

/// Behaviour switches for the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Reject images that are not already 28×28 instead of resizing them.
    pub strict: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Normalizer { options }
    }

    pub fn options(&self) -> NormalizerOptions {
        self.options
    }

    pub fn normalize(&self, payload: &EncodedImage) -> Result<NormalizedTensor> {
        let bytes = payload.decode().inspect_err(|e| warn!(error = %e, "rejected payload"))?;
        let image = parse_image(&bytes).inspect_err(|e| warn!(error = %e, "rejected payload"))?;
        debug!(
            width  = image.width(),
            height = image.height(),
            color  = ?image.color(),
            bytes  = bytes.len(),
            "decoded image"
        );
        self.normalize_image(&image)
    }

    /// Runs the steps after decoding on an already parsed image.
    pub fn normalize_image(&self, image: &DynamicImage) -> Result<NormalizedTensor> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(InferenceError::ImageFormat(format!("image has no pixels ({width}x{height})")));
        }
        if self.options.strict && (width as usize, height as usize) != (INPUT_WIDTH, INPUT_HEIGHT) {
            return Err(InferenceError::ImageFormat(format!(
                "strict mode requires {INPUT_WIDTH}x{INPUT_HEIGHT}, got {width}x{height}"
            )));
        }

        let gray = resize_to_input(to_luminance(image));
        NormalizedTensor::from_intensities(gray.as_raw())
    }
}

/// Normalizes with the default (lenient) options.
pub fn normalize(payload: &EncodedImage) -> Result<NormalizedTensor> {
    Normalizer::default().normalize(payload)
}

/// Parses image file bytes; the format is guessed from the content.
pub fn parse_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| InferenceError::ImageFormat(e.to_string()))
}

/// ITU-R BT.601 luma in 16-bit fixed point:
/// `L = (R·19595 + G·38470 + B·7471 + 32768) >> 16`.
///
/// The weights sum to 65536, so a gray pixel keeps its exact value.
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 32768) >> 16) as u8
}

/// Collapses any color mode to one 8-bit luminance channel. Alpha is
/// dropped, palettes are already expanded by the decoder, and 16-bit or
/// float images are first reduced to 8 bits per channel.
pub fn to_luminance(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| Luma([luma(rgb.get_pixel(x, y))]))
}

/// Bilinear resize to exactly 28×28. Aspect ratio is not preserved.
pub fn resize_to_input(gray: GrayImage) -> GrayImage {
    let (w, h) = (INPUT_WIDTH as u32, INPUT_HEIGHT as u32);
    if gray.dimensions() == (w, h) {
        return gray;
    }
    imageops::resize(&gray, w, h, FilterType::Triangle)
}
