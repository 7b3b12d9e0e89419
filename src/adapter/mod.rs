//! Resource adapter module
//!
//! # Overview
//!
//! Each endpoint family gets one adapter that knows three things:
//! - How to build a request from the current cursor
//! - Where the batch and the continuation token live in the response
//! - Which [`Termination`] rule ends its feed
//!
//! The paginator drives every adapter through the same loop.
//!
//! # Adapters
//!
//! | Adapter | Endpoint | Ends on |
//! |---------|----------|---------|
//! | [`BoardFeed`] | `BoardFeedResource` | `-end-` bookmark |
//! | [`AccountBoards`] | `BoardsResource` | `-end-` bookmark |
//! | [`BoardRelated`] | `BoardContentRecommendationResource` | `-end-` bookmark |
//! | [`PinRelated`] | `RelatedModulesResource` | `-end-` or no bookmarks |
//! | [`PinRelatedCursor`] | GraphQL related pins | no next cursor |
//! | [`SearchBoards`] | `BaseSearchResource` (boards) | `-end-` bookmark |
//! | [`SearchPins`] | `BaseSearchResource` (pins) | missing bookmark |
//!
//! [`PinDetail`] is not paginated: it scrapes one pin page under the retry
//! ladder and returns a single object.

mod board;
mod detail;
mod envelope;
mod pin;
mod query;
mod search;

pub use board::{AccountBoards, BoardFeed, BoardRelated};
pub use detail::{extract, PinDetail, PIN_QUERY_PATH};
pub use envelope::{id_of, lookup, require, require_items, OPTIONS_BOOKMARK};
pub use pin::{PinRelated, PinRelatedCursor, DEFAULT_CURSOR_COUNT, RELATED_PINS_QUERY_HASH};
pub use query::{collapse_booleans, encode_component, encode_resource_query, resource_data};
pub use search::{SearchBoards, SearchPins};

use crate::error::Result;
use crate::http::RequestSpec;
use crate::paginator::{Page, PageToken, Termination};
use crate::types::JsonValue;

/// Default batch size requested from bookmark endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// One endpoint family's request shape, envelope and end rule
pub trait ResourceAdapter: Send + Sync {
    /// Item type produced per batch
    type Item: Send;

    /// Identity used in events and errors
    fn label(&self) -> String;

    /// Build the request for the given cursor; `None` on the first call
    fn build_request(&self, cursor: Option<&str>) -> RequestSpec;

    /// Extract the batch and continuation token
    fn parse_response(&self, raw: &JsonValue) -> Result<Page<Self::Item>>;

    /// End-of-feed rule for this endpoint
    fn termination(&self) -> Termination;

    /// Whether `token` ends the feed
    fn is_end(&self, token: &PageToken) -> bool {
        self.termination().is_end(token)
    }

    /// Key used to drop repeated items; `None` keeps everything
    fn dedupe_key(&self, _item: &Self::Item) -> Option<String> {
        None
    }
}
