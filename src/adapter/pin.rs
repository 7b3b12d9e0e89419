//! Related-pin adapters
//!
//! Two dialects of the same feed: the bookmark resource and the GraphQL
//! cursor query.

use super::envelope::{options_bookmark_or_end, require, require_items};
use super::query::encode_resource_query;
use super::{ResourceAdapter, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::http::RequestSpec;
use crate::paginator::{Page, PageToken, Termination};
use crate::types::JsonValue;
use serde_json::{json, Value};

const RELATED_MODULES_PATH: &str = "/resource/RelatedModulesResource/get/";
const GRAPHQL_PATH: &str = "/_graphql/";
const CONNECTION_PATH: &str = "data.v3RelatedPinsForPinSeoQuery.data.connection";

/// Persisted query for `v3RelatedPinsForPinSeoQuery`
pub const RELATED_PINS_QUERY_HASH: &str =
    "a24165ab531bf5e03fa822c022620fd6e3104759d690e59413a3f097f9e8f751";

/// Largest batch the related modules resource accepts
pub const MAX_RELATED_PAGE_SIZE: u32 = 50;

/// Default batch size of the GraphQL dialect
pub const DEFAULT_CURSOR_COUNT: u32 = 12;

// ============================================================================
// Bookmark Dialect
// ============================================================================

/// Pins related to a pin, via `RelatedModulesResource`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRelated {
    pin_id: String,
    page_size: u32,
}

impl PinRelated {
    /// Create an adapter with the default batch size
    pub fn new(pin_id: impl Into<String>) -> Result<Self> {
        Self::with_page_size(pin_id, DEFAULT_PAGE_SIZE)
    }

    /// Create an adapter; `page_size` must be within `1..=50`
    pub fn with_page_size(pin_id: impl Into<String>, page_size: u32) -> Result<Self> {
        let pin_id = pin_id.into();
        if pin_id.trim().is_empty() {
            return Err(Error::invalid_value("pin_id", "must not be empty"));
        }
        if !(1..=MAX_RELATED_PAGE_SIZE).contains(&page_size) {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_RELATED_PAGE_SIZE}, got {page_size}"),
            ));
        }
        Ok(Self { pin_id, page_size })
    }

    fn options(&self, cursor: Option<&str>) -> Value {
        let mut options = json!({
            "pin_id": self.pin_id,
            "context_pin_ids": [],
            "page_size": self.page_size,
            "search_query": "",
            "source": "deep_linking",
            "top_level_source": "deep_linking",
            "top_level_source_depth": 1,
            "is_pdp": false,
        });
        if let (Some(cursor), Some(map)) = (cursor, options.as_object_mut()) {
            map.insert("bookmarks".to_string(), json!([cursor]));
        }
        options
    }
}

impl ResourceAdapter for PinRelated {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("related to pin {}", self.pin_id)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        let source_url = format!("/pin/{}/", self.pin_id);
        RequestSpec::get(RELATED_MODULES_PATH)
            .query(encode_resource_query(
                Some(&source_url),
                &self.options(cursor),
            ))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, "resource_response.data")?;
        Ok(Page::new(items, options_bookmark_or_end(raw)?))
    }

    fn termination(&self) -> Termination {
        Termination::end_marker()
    }
}

// ============================================================================
// Cursor Dialect
// ============================================================================

/// Pins related to a pin, via the GraphQL related pins query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRelatedCursor {
    pin_id: String,
    count: u32,
}

impl PinRelatedCursor {
    /// Create an adapter with the default batch size
    pub fn new(pin_id: impl Into<String>) -> Result<Self> {
        let pin_id = pin_id.into();
        if pin_id.trim().is_empty() {
            return Err(Error::invalid_value("pin_id", "must not be empty"));
        }
        Ok(Self {
            pin_id,
            count: DEFAULT_CURSOR_COUNT,
        })
    }

    /// Set the batch size
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    fn variables(&self, cursor: Option<&str>) -> Value {
        let mut variables = json!({
            "pinId": self.pin_id,
            "count": self.count,
            "source": null,
            "searchQuery": null,
            "topLevelSource": null,
            "topLevelSourceDepth": null,
            "contextPinIds": null,
            "isDesktop": true,
        });
        if let (Some(cursor), Some(map)) = (cursor, variables.as_object_mut()) {
            map.insert("cursor".to_string(), json!(cursor));
        }
        variables
    }
}

impl ResourceAdapter for PinRelatedCursor {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("related to pin {}", self.pin_id)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::post(
            GRAPHQL_PATH,
            json!({
                "queryHash": RELATED_PINS_QUERY_HASH,
                "variables": self.variables(cursor),
            }),
        )
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let connection = require(raw, CONNECTION_PATH)?;

        let edges_path = format!("{CONNECTION_PATH}.edges");
        let items = require_items(connection, "edges")
            .map_err(|_| Error::parse(&edges_path, "expected an array of edges"))?
            .into_iter()
            .map(|mut edge| {
                edge.get_mut("node")
                    .map(Value::take)
                    .ok_or_else(|| Error::parse(&edges_path, "edge without node"))
            })
            .collect::<Result<Vec<_>>>()?;

        let page_info = connection
            .get("pageInfo")
            .ok_or_else(|| Error::parse(format!("{CONNECTION_PATH}.pageInfo"), "field missing"))?;
        let has_next = page_info
            .get("hasNextPage")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let token = match page_info.get("endCursor").and_then(Value::as_str) {
            Some(cursor) if has_next && !cursor.is_empty() => PageToken::token(cursor),
            _ => PageToken::Absent,
        };

        Ok(Page::new(items, token))
    }

    fn termination(&self) -> Termination {
        Termination::AbsentToken
    }
}
