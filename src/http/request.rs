//! Request description handed from adapters to the transport

use crate::types::{JsonValue, Method};

/// A fully described request
///
/// `query` is already percent-encoded; the transport appends it verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL
    pub path: String,
    /// Pre-encoded query string without the leading `?`
    pub query: Option<String>,
    /// JSON body for POST requests
    pub body: Option<JsonValue>,
    /// Append a `_=<unix millis>` parameter when sending
    pub cache_bust: bool,
}

impl RequestSpec {
    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
            ..Default::default()
        }
    }

    /// Set the pre-encoded query string
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Request a cache buster parameter
    #[must_use]
    pub fn cache_bust(mut self) -> Self {
        self.cache_bust = true;
        self
    }

    /// Resolve against a base URL, without the cache buster
    pub fn url(&self, base_url: &str) -> String {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            let base = base_url.trim_end_matches('/');
            let path = self.path.trim_start_matches('/');
            format!("{base}/{path}")
        };

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(query);
        }
        url
    }
}
