use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{InferenceError, Result};

/// How the bytes of an `EncodedImage` are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `<metadata-prefix>,<base64-payload>`, as produced by a browser
    /// canvas' `toDataURL()`. Only the text after the first comma is used.
    DataUri,
    /// Raw image file bytes (PNG, JPEG, ...), no transport wrapping.
    Binary,
}

/// A client-supplied image payload, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    encoding: Encoding,
    payload:  Vec<u8>,
}

impl EncodedImage {
    pub fn data_uri(text: impl Into<String>) -> Self {
        EncodedImage { encoding: Encoding::DataUri, payload: text.into().into_bytes() }
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        EncodedImage { encoding: Encoding::Binary, payload: bytes.into() }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Strips the transport wrapping and returns the image file bytes.
    ///
    /// For `DataUri` payloads everything up to and including the first comma
    /// is discarded and the remainder is decoded as standard, padded base64.
    /// A missing comma or invalid base64 is a `Decode` error. A second comma
    /// stays part of the payload (and so fails base64) rather than ending
    /// it, as splitting on every comma and taking the second piece would.
    pub fn decode(&self) -> Result<Cow<'_, [u8]>> {
        match self.encoding {
            Encoding::Binary  => Ok(Cow::Borrowed(&self.payload)),
            Encoding::DataUri => {
                let text = std::str::from_utf8(&self.payload)
                    .map_err(|e| InferenceError::Decode(format!("payload is not UTF-8: {e}")))?;
                let (_prefix, body) = text.split_once(',').ok_or_else(|| {
                    InferenceError::Decode("missing ',' between data-URI prefix and payload".into())
                })?;
                STANDARD
                    .decode(body.trim())
                    .map(Cow::Owned)
                    .map_err(|e| InferenceError::Decode(format!("invalid base64: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_prefix_is_stripped() {
        let img = EncodedImage::data_uri("data:image/png;base64,aGVsbG8=");
        assert_eq!(img.decode().unwrap().as_ref(), b"hello");
    }

    #[test]
    fn empty_prefix_is_accepted() {
        let img = EncodedImage::data_uri(",aGVsbG8=");
        assert_eq!(img.decode().unwrap().as_ref(), b"hello");
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let img = EncodedImage::data_uri("data:image/png;base64,aGVsbG8=\n");
        assert_eq!(img.decode().unwrap().as_ref(), b"hello");
    }

    #[test]
    fn raw_base64_without_separator_is_a_decode_error() {
        let img = EncodedImage::data_uri("aGVsbG8=");
        assert!(matches!(img.decode(), Err(InferenceError::Decode(_))));
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let img = EncodedImage::data_uri("data:image/png;base64,not*base64!");
        assert!(matches!(img.decode(), Err(InferenceError::Decode(_))));
    }

    #[test]
    fn second_comma_is_not_base64() {
        let img = EncodedImage::data_uri("data:image/png;base64,aGVs,bG8=");
        assert!(matches!(img.decode(), Err(InferenceError::Decode(_))));
    }

    #[test]
    fn binary_payload_passes_through() {
        let img = EncodedImage::binary(vec![0x89, b'P', b'N', b'G']);
        assert_eq!(img.decode().unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);
        assert_eq!(img.encoding(), Encoding::Binary);
    }
}
