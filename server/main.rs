//! ferrite-digits server
//!
//! Serves `POST /predict` for hand-drawn digits. The request body is
//! `{"image": "data:image/png;base64,..."}` (what a browser canvas'
//! `toDataURL()` produces) and the answer is `{"prediction": n}`.
//!
//! Run with:
//!   DIGITS_MODEL=trained_models/mnist.json cargo run --bin digit-server --release
//!
//! See `config.rs` for every environment variable. Log verbosity follows
//! `RUST_LOG` (default `info`).

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;
use tiny_http::Server;
use tracing::{error, info};

use ferrite_digits::{DigitPipeline, ModelHandle, Normalizer, NormalizerOptions, PredictionService};

use config::ServerConfig;
use state::ServerState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c)  => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // The model must be in place before the first request is accepted.
    info!(path = %config.model_path, "loading model");
    let model = match ModelHandle::load(&config.model_path) {
        Ok(m)  => m,
        Err(e) => {
            error!(error = %e, "could not load model");
            std::process::exit(1);
        }
    };

    let normalizer = Normalizer::new(NormalizerOptions { strict: config.strict });
    let pipeline   = DigitPipeline::new(normalizer, PredictionService::ready(model));

    let server = match Server::http(config.addr.as_str()) {
        Ok(s)  => s,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind HTTP server");
            std::process::exit(1);
        }
    };
    info!(addr = %config.addr, strict = config.strict, "listening");

    let state = Arc::new(ServerState::new(pipeline, config));

    // One thread per request; preprocessing runs fully in parallel and the
    // model is only ever read.
    for request in server.incoming_requests() {
        let state = state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state);
        });
    }
}
