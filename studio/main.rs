/// sketch-nn Studio
///
/// A JSON classification service for hand-drawn digits and Hangul syllables.
/// Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin studio --release
/// Then POST an image:
///   curl --data-binary @drawing.png http://127.0.0.1:7878/classify?top_k=3
///
/// Set SKETCH_STUDIO_CONFIG to a JSON file to override the defaults.

mod state;
mod routes;
mod handlers;
mod util;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sketch_nn::StudioConfig;
use state::StudioState;

fn load_config() -> sketch_nn::Result<StudioConfig> {
    match std::env::var_os("SKETCH_STUDIO_CONFIG") {
        Some(path) => StudioConfig::load_json(path),
        None => Ok(StudioConfig::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid studio configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = StudioState::from_config(&config);
    if state.registry.is_empty() {
        error!(models_dir = %config.models_dir.display(), "no model could be loaded");
        return ExitCode::FAILURE;
    }

    let server = match Server::http(&config.bind) {
        Ok(s) => s,
        Err(e) => {
            error!(bind = %config.bind, error = %e, "failed to bind HTTP server");
            return ExitCode::FAILURE;
        }
    };
    info!(bind = %config.bind, "studio listening");

    let shared_state = Arc::new(Mutex::new(state));

    // One thread per request.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    ExitCode::SUCCESS
}
