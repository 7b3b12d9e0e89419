//! Query string encoding for the resource endpoints
//!
//! The endpoints take a `data` parameter holding
//! `{"options": ..., "context": {}}` as percent-encoded JSON, with spaces as
//! `%20` and quoted booleans unquoted after encoding.

use serde_json::{json, Value};
use url::form_urlencoded;

/// Percent-encode a component, spaces as `%20`
pub fn encode_component(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Turn `:"true"` / `:"false"` into bare booleans in an encoded string
pub fn collapse_booleans(encoded: &str) -> String {
    encoded
        .replace("%3A%22true%22", "%3Atrue")
        .replace("%3A%22false%22", "%3Afalse")
}

/// The `data` payload wrapping endpoint options
pub fn resource_data(options: &Value) -> Value {
    json!({ "options": options, "context": {} })
}

/// Build `[source_url=...&]data=...` for a resource endpoint
pub fn encode_resource_query(source_url: Option<&str>, options: &Value) -> String {
    let data = resource_data(options).to_string();
    let query = match source_url {
        Some(source) => format!(
            "source_url={}&data={}",
            encode_component(source),
            encode_component(&data)
        ),
        None => format!("data={}", encode_component(&data)),
    };
    collapse_booleans(&query)
}
