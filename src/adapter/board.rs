//! Board adapters: board feed, account boards and related board content

use super::envelope::{options_bookmark, require_items};
use super::query::encode_resource_query;
use super::{ResourceAdapter, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::http::RequestSpec;
use crate::paginator::{Page, Termination};
use crate::types::JsonValue;
use serde_json::{json, Map, Value};

const BOARD_FEED_PATH: &str = "/resource/BoardFeedResource/get/";
const BOARDS_PATH: &str = "/resource/BoardsResource/get/";
const BOARD_RELATED_PATH: &str = "/_ngjs/resource/BoardContentRecommendationResource/get/";

fn with_bookmark(mut options: Map<String, Value>, cursor: Option<&str>) -> Value {
    if let Some(cursor) = cursor {
        options.insert("bookmarks".to_string(), json!([cursor]));
    }
    Value::Object(options)
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// Board Feed
// ============================================================================

/// Pins on a board, optionally limited to one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFeed {
    board_id: String,
    section_id: Option<String>,
    shortform: Option<String>,
    page_size: u32,
}

impl BoardFeed {
    /// Create a feed for a board id
    pub fn new(board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            section_id: None,
            shortform: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Restrict to a board section
    #[must_use]
    pub fn section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }

    /// Name the board as `user/slug[/section]` in events
    #[must_use]
    pub fn shortform(mut self, username: &str, board_slug: &str, section_slug: Option<&str>) -> Self {
        let mut parts = vec![username, board_slug];
        parts.extend(section_slug);
        self.shortform = Some(parts.join("/"));
        self
    }

    /// Set the batch size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The board id
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    fn options(&self, cursor: Option<&str>) -> Value {
        let mut options = into_map(json!({
            "isPrefetch": false,
            "board_id": self.board_id,
            "field_set_key": "react_grid_pin",
            "filter_section_pins": true,
            "layout": "default",
            "page_size": self.page_size,
            "redux_normalize_feed": true,
        }));
        if let Some(ref section) = self.section_id {
            options.insert("section_id".to_string(), json!(section));
        }
        with_bookmark(options, cursor)
    }
}

impl ResourceAdapter for BoardFeed {
    type Item = JsonValue;

    fn label(&self) -> String {
        self.shortform
            .clone()
            .unwrap_or_else(|| format!("board {}", self.board_id))
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::get(BOARD_FEED_PATH)
            .query(encode_resource_query(None, &self.options(cursor)))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, "resource_response.data")?;
        Ok(Page::new(items, options_bookmark(raw)?))
    }

    fn termination(&self) -> Termination {
        Termination::end_marker()
    }
}

// ============================================================================
// Account Boards
// ============================================================================

/// Every board of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBoards {
    username: String,
    page_size: u32,
}

impl AccountBoards {
    /// Create an adapter for a username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
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
        let options = into_map(json!({
            "isPrefetch": false,
            "privacy_filter": "all",
            "sort": "alphabetical",
            "field_set_key": "profile_grid_item",
            "username": self.username,
            "page_size": self.page_size,
            "group_by": "visibility",
            "include_archived": true,
            "redux_normalize_feed": true,
        }));
        with_bookmark(options, cursor)
    }
}

impl ResourceAdapter for AccountBoards {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("boards of {}", self.username)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::get(BOARDS_PATH)
            .query(encode_resource_query(
                Some(&self.username),
                &self.options(cursor),
            ))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, "resource_response.data")?;
        Ok(Page::new(items, options_bookmark(raw)?))
    }

    fn termination(&self) -> Termination {
        Termination::end_marker()
    }
}

// ============================================================================
// Board Related
// ============================================================================

/// Pins recommended for a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRelated {
    board_id: String,
    page_size: u32,
}

impl BoardRelated {
    /// Create an adapter for a board id
    pub fn new(board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn options(&self, cursor: Option<&str>) -> Value {
        let options = into_map(json!({
            "isPrefetch": false,
            "type": "board",
            "id": self.board_id,
            "page_size": self.page_size,
        }));
        with_bookmark(options, cursor)
    }
}

impl ResourceAdapter for BoardRelated {
    type Item = JsonValue;

    fn label(&self) -> String {
        format!("related to board {}", self.board_id)
    }

    fn build_request(&self, cursor: Option<&str>) -> RequestSpec {
        RequestSpec::get(BOARD_RELATED_PATH)
            .query(encode_resource_query(None, &self.options(cursor)))
            .cache_bust()
    }

    fn parse_response(&self, raw: &JsonValue) -> Result<Page<JsonValue>> {
        let items = require_items(raw, "resource_response.data")?;
        Ok(Page::new(items, options_bookmark(raw)?))
    }

    fn termination(&self) -> Termination {
        Termination::end_marker()
    }
}
