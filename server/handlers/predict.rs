use std::io::{Cursor, Read};

use serde::Deserialize;
use tiny_http::{Request, Response};
use tracing::warn;

use ferrite_digits::{DigitPipeline, EncodedImage, InferenceError};

use crate::state::ServerState;

/// JSON request body: `{"image": "data:image/png;base64,...."}`.
#[derive(Debug, Deserialize)]
struct PredictRequest {
    image: String,
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, state: &ServerState) -> (u16, Response<Cursor<Vec<u8>>>) {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let limit = state.config.max_body_bytes;
    let mut body: Vec<u8> = Vec::new();
    let read = request.as_reader().take(limit as u64 + 1).read_to_end(&mut body);

    let (status, json) = match read {
        Err(e) => error_body(400, "bad_request", format!("could not read request body: {e}")),
        Ok(_) if body.len() > limit => {
            error_body(413, "payload_too_large", format!("request body exceeds {limit} bytes"))
        }
        Ok(_) => respond_to(&content_type, &body, &state.pipeline),
    };
    (status, crate::routes::json_response(status, json))
}

/// Turns a request body into `(status, json)`. `image/*` bodies are taken as
/// raw image bytes; anything else must be the JSON request object.
pub fn respond_to(content_type: &str, body: &[u8], pipeline: &DigitPipeline) -> (u16, String) {
    let payload = if content_type.starts_with("image/") {
        EncodedImage::binary(body)
    } else {
        match serde_json::from_slice::<PredictRequest>(body) {
            Ok(req) => EncodedImage::data_uri(req.image),
            Err(e)  => return error_body(400, "bad_request", format!("expected {{\"image\": \"...\"}}: {e}")),
        }
    };

    match pipeline.classify(&payload) {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(json) => (200, json),
            Err(e)   => error_body(500, "internal_error", e.to_string()),
        },
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "prediction failed");
            error_body(status_for(&e), e.kind(), e.to_string())
        }
    }
}

/// Each error kind gets its own status so clients can tell them apart.
pub fn status_for(error: &InferenceError) -> u16 {
    match error {
        InferenceError::Decode(_)            => 400,
        InferenceError::ImageFormat(_)       => 415,
        InferenceError::ShapeMismatch { .. } => 422,
        InferenceError::InvalidTensor { .. } => 422,
        InferenceError::ModelNotReady        => 503,
        InferenceError::ModelLoad { .. }
        | InferenceError::AlreadyLoaded      => 500,
    }
}

fn error_body(status: u16, kind: &str, message: String) -> (u16, String) {
    (status, serde_json::json!({ "error": kind, "message": message }).to_string())
}
