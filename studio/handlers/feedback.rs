use tiny_http::Request;

use crate::handlers::stats::tally_json;
use crate::routes::{classify_error_response, error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};
use crate::util::form::{form_get, parse_bool};

// ---------------------------------------------------------------------------
// POST /feedback   correct=true|false
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, query: &str, state: SharedState) -> HttpResponse {
    let pairs = super::form_pairs(request, query);
    let Some(raw) = form_get(&pairs, "correct") else {
        return error_response(400, "missing field: correct");
    };
    let Some(correct) = parse_bool(raw) else {
        return error_response(400, &format!("not a yes/no answer: {}", raw));
    };

    // Held across load/save so concurrent feedback is not lost.
    let st = lock(&state);
    match st.tally.record(correct) {
        Ok(tally) => json_response(200, &tally_json(&tally)),
        Err(e) => classify_error_response(&e),
    }
}
