pub mod classify;
pub mod feedback;
pub mod models;
pub mod stats;

use std::io::Read;

use tiny_http::Request;

/// Reads the whole request body. A failed read yields whatever arrived.
pub fn read_body(request: &mut Request) -> Vec<u8> {
    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        tracing::warn!(error = %e, "request body truncated");
    }
    body
}

/// Form pairs from the query string followed by those of an urlencoded body.
pub fn form_pairs(request: &mut Request, query: &str) -> Vec<(String, String)> {
    let mut pairs = crate::util::form::parse_form(query);
    let body = read_body(request);
    pairs.extend(crate::util::form::parse_form(&String::from_utf8_lossy(&body)));
    pairs
}
