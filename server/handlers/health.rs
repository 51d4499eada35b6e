use std::io::Cursor;
use tiny_http::Response;

use crate::state::ServerState;

/// `GET /health`
///
/// 200 once the model is installed, 503 before that.
pub fn handle(state: &ServerState) -> (u16, Response<Cursor<Vec<u8>>>) {
    let (status, body) = health_body(state.pipeline.service().is_ready());
    (status, crate::routes::json_response(status, body.to_owned()))
}

fn health_body(ready: bool) -> (u16, &'static str) {
    if ready {
        (200, r#"{"status":"ready"}"#)
    } else {
        (503, r#"{"status":"loading"}"#)
    }
}
