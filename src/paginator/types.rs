//! Pagination types
//!
//! Tokens, termination rules, batches and the per-run state.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Canonical end-of-feed bookmark
pub const END_MARKER: &str = "-end-";

// ============================================================================
// Tokens and Termination
// ============================================================================

/// What one response says about continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// A continuation token
    Token(String),
    /// The token field is present but null
    Absent,
    /// The token field is not in the envelope at all
    Missing,
}

impl PageToken {
    /// Build a token from an optional JSON value
    ///
    /// Strings are taken as-is, `null` is [`PageToken::Absent`], a missing
    /// field is [`PageToken::Missing`] and other scalars are stringified.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => Self::Missing,
            Some(Value::Null) => Self::Absent,
            Some(Value::String(s)) => Self::Token(s.clone()),
            Some(other) => Self::Token(other.to_string()),
        }
    }

    /// Create a token
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(value.into())
    }

    /// Cursor to send with the next request, if any
    pub fn as_cursor(&self) -> Option<&str> {
        match self {
            Self::Token(t) => Some(t),
            Self::Absent | Self::Missing => None,
        }
    }
}

/// Strip one layer of quoting from a bookmark
///
/// Both `"-end-"` and its percent-escaped form `%22-end-%22` reduce to `-end-`.
pub fn canonical_token(token: &str) -> &str {
    let token = token.trim();
    if let Some(inner) = token
        .strip_prefix("%22")
        .and_then(|t| t.strip_suffix("%22"))
    {
        return inner;
    }
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

/// How an endpoint signals the last page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "marker", rename_all = "snake_case")]
pub enum Termination {
    /// The token equals a sentinel after canonicalisation, or is empty
    EndMarker(String),
    /// The token is null, absent or empty
    AbsentToken,
    /// The token field is missing, null or empty, or carries `-end-`
    MissingField,
}

impl Default for Termination {
    fn default() -> Self {
        Self::end_marker()
    }
}

impl Termination {
    /// The standard `-end-` sentinel
    pub fn end_marker() -> Self {
        Self::EndMarker(END_MARKER.to_string())
    }

    /// Whether this token ends pagination
    ///
    /// A response without a usable cursor always ends the run, whatever the
    /// rule: there is nothing to send back. An empty or blank token counts as
    /// no cursor.
    pub fn is_end(&self, token: &PageToken) -> bool {
        let Some(token) = token.as_cursor().map(canonical_token) else {
            return true;
        };
        if token.is_empty() {
            return true;
        }
        match self {
            Self::EndMarker(marker) => token == canonical_token(marker),
            Self::AbsentToken => false,
            Self::MissingField => token == END_MARKER,
        }
    }
}

// ============================================================================
// Batches and State
// ============================================================================

/// Items from one call plus its continuation token
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in arrival order, possibly empty
    pub items: Vec<T>,
    /// Continuation reported by the response
    pub token: PageToken,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, token: PageToken) -> Self {
        Self { items, token }
    }

    /// Number of items in this batch
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this batch carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks one paginated run
#[derive(Debug, Clone)]
pub struct PaginationState<T> {
    /// Cursor for the next request; unset before the first call
    pub token: Option<String>,
    /// Accumulated items in arrival order
    pub items: Vec<T>,
    /// Successful batches so far
    pub pages: usize,
    seen: HashSet<String>,
}

impl<T> Default for PaginationState<T> {
    fn default() -> Self {
        Self {
            token: None,
            items: Vec::new(),
            pages: 0,
            seen: HashSet::new(),
        }
    }
}

impl<T> PaginationState<T> {
    /// Create a fresh state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor
    pub fn cursor(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Append a batch and move to its token
    ///
    /// Items whose dedupe key was already seen are dropped. Returns the number
    /// of items appended.
    pub fn advance<K>(&mut self, page: Page<T>, dedupe_key: K) -> usize
    where
        K: Fn(&T) -> Option<String>,
    {
        let before = self.items.len();
        for item in page.items {
            if let Some(key) = dedupe_key(&item) {
                if !self.seen.insert(key) {
                    continue;
                }
            }
            self.items.push(item);
        }
        self.token = page.token.as_cursor().map(str::to_owned);
        self.pages += 1;
        self.items.len() - before
    }

    /// Total accumulated items
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The termination rule fired
    Completed,
    /// A terminal failure or the page limit stopped the run early
    PartialAborted,
    /// Cancellation or the deadline stopped the run early
    Cancelled,
}

impl RunStatus {
    /// Check if the run reached the end of the feed
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::PartialAborted => f.write_str("aborted"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of a paginated run
#[derive(Debug)]
pub struct RunOutcome<T> {
    /// Items accumulated before the run stopped
    pub items: Vec<T>,
    /// How the run ended
    pub status: RunStatus,
    /// Successful batches
    pub pages: usize,
    /// The failure that stopped the run, if any
    pub error: Option<Error>,
}

impl<T> RunOutcome<T> {
    /// Check if the run completed
    pub fn is_complete(&self) -> bool {
        self.status.is_completed()
    }

    /// Transform the items, keeping status and error
    pub fn map<U, F>(self, f: F) -> RunOutcome<U>
    where
        F: FnMut(T) -> U,
    {
        RunOutcome {
            items: self.items.into_iter().map(f).collect(),
            status: self.status,
            pages: self.pages,
            error: self.error,
        }
    }
}
