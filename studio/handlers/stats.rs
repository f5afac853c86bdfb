use sketch_nn::Tally;

use crate::routes::{classify_error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};

pub fn tally_json(tally: &Tally) -> serde_json::Value {
    serde_json::json!({
        "total": tally.total,
        "correct": tally.correct,
        "accuracy": tally.accuracy(),
    })
}

/// `GET /stats`
pub fn handle_get(state: SharedState) -> HttpResponse {
    let st = lock(&state);
    match st.tally.load() {
        Ok(tally) => json_response(200, &tally_json(&tally)),
        Err(e) => classify_error_response(&e),
    }
}
