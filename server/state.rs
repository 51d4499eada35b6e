use ferrite_digits::DigitPipeline;

use crate::config::ServerConfig;

/// Everything a request handler needs, shared read-only via `Arc`.
#[derive(Debug)]
pub struct ServerState {
    pub pipeline: DigitPipeline,
    pub config:   ServerConfig,
}

impl ServerState {
    pub fn new(pipeline: DigitPipeline, config: ServerConfig) -> Self {
        ServerState { pipeline, config }
    }
}
