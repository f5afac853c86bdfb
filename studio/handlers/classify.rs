use std::sync::Arc;

use serde::Serialize;
use tiny_http::Request;

use sketch_nn::{ClassifyError, ModelVariant, Prediction};

use crate::routes::{classify_error_response, content_type, error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};
use crate::util::form::{form_get, parse_form};
use crate::util::multipart::{extract_boundary, extract_file, extract_text_field};

#[derive(Serialize)]
struct ClassifyResponse<'a> {
    variant: ModelVariant,
    top_k: usize,
    predictions: &'a [Prediction],
}

/// Picks the candidate count: the query string wins over a form field, and a
/// missing or blank value means `default`.
pub fn resolve_top_k(query: Option<&str>, field: Option<&str>, default: usize) -> Result<usize, ClassifyError> {
    let raw = query.or(field).map(str::trim).filter(|v| !v.is_empty());
    match raw {
        None => Ok(default),
        Some(v) => v.parse::<usize>().map_err(|_| ClassifyError::InvalidTopK),
    }
}

// ---------------------------------------------------------------------------
// POST /classify[?top_k=N]
// ---------------------------------------------------------------------------

/// Accepts either a raw image body or a multipart upload with one file part.
/// A multipart `top_k` field is used when the query string has none.
pub fn handle(request: &mut Request, query: &str, state: SharedState) -> HttpResponse {
    let content_type = content_type(request);
    let body = super::read_body(request);
    let query_pairs = parse_form(query);

    let (image, field_top_k): (&[u8], Option<String>) = if content_type.starts_with("multipart/form-data") {
        let Some(boundary) = extract_boundary(&content_type) else {
            return error_response(400, "multipart body without boundary");
        };
        (
            extract_file(&body, &boundary).unwrap_or(&[]),
            extract_text_field(&body, &boundary, "top_k"),
        )
    } else {
        (body.as_slice(), None)
    };

    let st = lock(&state);
    let default_top_k = st.top_k;
    let classifier = match st.registry.active() {
        Ok(c) => Arc::clone(c),
        Err(e) => return classify_error_response(&e),
    };
    drop(st);

    let top_k = match resolve_top_k(form_get(&query_pairs, "top_k"), field_top_k.as_deref(), default_top_k) {
        Ok(k) => k,
        Err(e) => return classify_error_response(&e),
    };

    match classifier.classify_bytes(image, top_k) {
        Ok(ranked) => json_response(
            200,
            &ClassifyResponse {
                variant: classifier.variant(),
                top_k,
                predictions: &ranked.predictions,
            },
        ),
        Err(e) => classify_error_response(&e),
    }
}
