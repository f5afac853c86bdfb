use std::io::Cursor;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{debug, warn};

use sketch_nn::ClassifyError;

use crate::handlers;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::from_data(bytes).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    response
}

pub fn error_response(status: u16, message: &str) -> HttpResponse {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// HTTP status for a pipeline error.
pub fn error_status(err: &ClassifyError) -> u16 {
    match err {
        ClassifyError::VariantNotLoaded(_) | ClassifyError::NoModelLoaded => 409,
        e if e.is_client_error() => 400,
        _ => 500,
    }
}

pub fn classify_error_response(err: &ClassifyError) -> HttpResponse {
    let status = error_status(err);
    warn!(status, error = %err, "request failed");
    error_response(status, &err.to_string())
}

pub fn not_found() -> HttpResponse {
    error_response(404, "not found")
}

/// Value of the request's Content-Type header, or an empty string.
pub fn content_type(request: &Request) -> String {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes a request to its handler and sends the response.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p.to_owned(), q.to_owned()),
        None => (url.clone(), String::new()),
    };
    debug!(%method, %path, "request");

    let response = match (method, path.as_str()) {
        (Method::Get,  "/health")        => json_response(200, &serde_json::json!({ "status": "ok" })),

        // ── Models ───────────────────────────────────────────────────────
        (Method::Get,  "/models")        => handlers::models::handle_list(state),
        (Method::Post, "/models/active") => handlers::models::handle_activate(&mut request, &query, state),

        // ── Inference ────────────────────────────────────────────────────
        (Method::Post, "/classify")      => handlers::classify::handle(&mut request, &query, state),

        // ── Feedback / statistics ────────────────────────────────────────
        (Method::Post, "/feedback")      => handlers::feedback::handle(&mut request, &query, state),
        (Method::Get,  "/stats")         => handlers::stats::handle_get(state),

        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to send response");
    }
}
