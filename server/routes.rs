use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::info;

use crate::handlers;
use crate::state::ServerState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).into_iter().collect(),
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    json_response(404, r#"{"error":"not_found","message":"no such route"}"#.to_owned())
}

pub fn method_not_allowed() -> Response<Cursor<Vec<u8>>> {
    json_response(405, r#"{"error":"method_not_allowed","message":"unsupported method"}"#.to_owned())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches one request and logs its outcome.
///
/// Handlers receive a `&mut Request` so the dispatcher keeps ownership and
/// responds at the end.
pub fn dispatch(mut request: Request, state: Arc<ServerState>) {
    let started = Instant::now();
    let method  = request.method().clone();
    let url     = request.url().to_owned();
    let path    = url.split('?').next().unwrap_or("").to_owned();

    let (status, response) = match (&method, path.as_str()) {
        (Method::Post, "/predict") => handlers::predict::handle(&mut request, &state),
        (Method::Get,  "/health")  => handlers::health::handle(&state),
        (_, "/predict") | (_, "/health") => (405, method_not_allowed()),
        _ => (404, not_found()),
    };

    info!(
        method = %method,
        path = %path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    let _ = request.respond(response);
}
