use serde::Serialize;
use tiny_http::Request;

use sketch_nn::{ElementKind, ModelVariant};

use crate::routes::{classify_error_response, error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};
use crate::util::form::form_get;

#[derive(Serialize)]
struct LoadedModel {
    variant: ModelVariant,
    element_kind: ElementKind,
    classes: usize,
    input_shape: [usize; 4],
}

#[derive(Serialize)]
struct ModelList {
    active: Option<ModelVariant>,
    models: Vec<LoadedModel>,
}

/// `GET /models`
pub fn handle_list(state: SharedState) -> HttpResponse {
    let st = lock(&state);
    let registry = &st.registry;
    let models = registry
        .variants()
        .filter_map(|v| registry.get(v).ok())
        .map(|c| LoadedModel {
            variant: c.variant(),
            element_kind: c.element_kind(),
            classes: c.labels().len(),
            input_shape: c.variant().input_shape().dims(),
        })
        .collect();
    json_response(200, &ModelList { active: registry.active_variant(), models })
}

/// `POST /models/active` with `variant=digits|hangul` in the body or query.
pub fn handle_activate(request: &mut Request, query: &str, state: SharedState) -> HttpResponse {
    let pairs = super::form_pairs(request, query);
    let variant = match form_get(&pairs, "variant").map(str::parse::<ModelVariant>) {
        Some(Ok(v)) => v,
        Some(Err(e)) => return error_response(400, &e),
        None => return error_response(400, "missing field: variant"),
    };

    let mut st = lock(&state);
    match st.registry.activate(variant) {
        Ok(()) => json_response(200, &serde_json::json!({ "active": variant })),
        Err(e) => classify_error_response(&e),
    }
}
