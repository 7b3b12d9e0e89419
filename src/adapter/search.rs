//! Search adapters
//!
//! Both scopes hit `BaseSearchResource` but echo the continuation in
//! different places, so each keeps its own end rule.

use super::envelope::{id_of, lookup, options_bookmark, require_items};
use super::query::{encode_component, encode_resource_query};
use super::{ResourceAdapter, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::http::RequestSpec;
use crate::paginator::{Page, PageToken, Termination};
use crate::types::JsonValue;
use serde_json::{json, Value};

const SEARCH_PATH: &str = "/resource/BaseSearchResource/get/";
const RESULTS_PATH: &str = "resource_response.data.results";

/// Options shared by both scopes; the endpoint expects the literal string
/// `"null"` for unused filters
fn search_options(query: &str, scope: &str, page_size: Value, source_url: String) -> Value {
    json!({
        "applied_unified_filters": "null",
        "appliedProductFilters": "---",
        "auto_correction_disabled": false,
        "corpus": "null",
        "customized_rerank_type": "null",
        "domains": "null",
        "filters": "null",
        "journey_depth": "null",
        "page_size": page_size,
        "price_max": "null",
        "price_min": "null",
        "query_pin_sigs": "null",
        "query": query,
        "redux_normalize_feed": true,
        "request_params": "null",
        "rs": "content_type_filter",
        "scope": scope,
        "selected_one_bar_modules": "null",
        "seoDrawerEnabled": false,
        "source_id": "null",
        "source_module_id": "null",
        "source_url": source_url,
        "top_pin_id": "null",
        "top_pin_ids": "null",
    })
}

fn insert(options: &mut Value, key: &str, value: Value) {
    if let Some(map) = options.as_object_mut() {
        map.insert(key.to_string(), value);
    }
}

// ============================================================================
// Boards
// ============================================================================

/// Boards matching a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoards {
    query: String,
}

impl SearchBoards {
    /// Create an adapter for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    fn options(&self, cursor: Option<&str>) -> Value {
        let source_url = format!(
            "/search/boards/?q={}&rs=content_type_filter",
            encode_component(&self.query)
        );
        let mut options = search_options(&self.query, "boards", json!("null"), source_url);
        insert(&mut options, "article", json!("null"));
        insert(&mut options, "dynamicPageSizeExpGroup", json!("enabled_275"));
        if let Some(cursor) = cursor {
            insert(&mut options, "bookmarks", json!([cursor]));
        }
        options
    }
}

impl ResourceAdapter for SearchBoards {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("board search '{}'", self.query)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::get(SEARCH_PATH)
            .query(encode_resource_query(None, &self.options(cursor)))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, RESULTS_PATH)?;
        Ok(Page::new(items, options_bookmark(raw)?))
    }

    fn termination(&self) -> Termination {
        Termination::end_marker()
    }

    fn dedupe_key(&self, item: &JsonValue) -> Option<String> {
        id_of(item)
    }
}

// ============================================================================
// Pins
// ============================================================================

/// Pins matching a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPins {
    query: String,
    page_size: u32,
}

impl SearchPins {
    /// Create an adapter for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the batch size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn options(&self, cursor: Option<&str>) -> Value {
        let source_url = format!("/search/pins/?q={}&rs=typed", encode_component(&self.query));
        let mut options =
            search_options(&self.query, "pins", json!(self.page_size), source_url);
        insert(&mut options, "dynamicPageSizeExpGroup", json!("null"));
        if let Some(cursor) = cursor {
            insert(&mut options, "bookmarks", json!([cursor]));
        }
        options
    }
}

impl ResourceAdapter for SearchPins {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("pin search '{}'", self.query)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::get(SEARCH_PATH)
            .query(encode_resource_query(None, &self.options(cursor)))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, RESULTS_PATH)?;
        let token = PageToken::from_value(lookup(raw, "resource_response.bookmark"));
        Ok(Page::new(items, token))
    }

    fn termination(&self) -> Termination {
        Termination::MissingField
    }
}
