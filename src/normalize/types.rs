//! Summary types

use crate::adapter::{id_of, lookup};
use crate::types::JsonValue;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// `created_at` format used by the resource endpoints
const CREATED_AT_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Parse a `created_at` string into unix seconds
pub fn parse_created_at(raw: &str) -> Option<i64> {
    DateTime::parse_from_str(raw.trim(), CREATED_AT_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(raw.trim()))
        .ok()
        .map(|dt| dt.timestamp())
}

fn str_at(raw: &JsonValue, path: &str) -> String {
    lookup(raw, path)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn u64_at(raw: &JsonValue, path: &str) -> u64 {
    lookup(raw, path).and_then(JsonValue::as_u64).unwrap_or(0)
}

/// Save and repin counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCounts {
    pub save: u64,
    pub repin: u64,
}

/// Text attached to a pin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinText {
    pub title: String,
    pub auto_alt_text: String,
}

/// The persisted view of a pin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSummary {
    pub id: String,
    /// Original-size image URL
    pub url: String,
    pub width: u64,
    pub height: u64,
    /// Unix seconds, 0 when unknown
    pub created_at: i64,
    pub dominant_color: String,
    pub count: PinCounts,
    pub text: PinText,
}

impl PinSummary {
    /// Build a summary from a raw pin
    pub fn from_raw(raw: &JsonValue) -> Self {
        Self {
            id: id_of(raw).unwrap_or_default(),
            url: str_at(raw, "images.orig.url"),
            width: u64_at(raw, "images.orig.width"),
            height: u64_at(raw, "images.orig.height"),
            created_at: lookup(raw, "created_at")
                .and_then(JsonValue::as_str)
                .and_then(parse_created_at)
                .unwrap_or(0),
            dominant_color: str_at(raw, "dominant_color"),
            count: PinCounts {
                save: u64_at(raw, "aggregate_metadata.aggregated_stats.saves"),
                repin: u64_at(raw, "repin_count"),
            },
            text: PinText {
                title: str_at(raw, "title"),
                auto_alt_text: str_at(raw, "auto_alt_text"),
            },
        }
    }
}

/// The persisted view of a board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub follower_count: u64,
    pub pin_count: u64,
}

impl BoardSummary {
    /// Build a summary from a raw board
    pub fn from_raw(raw: &JsonValue) -> Self {
        Self {
            id: id_of(raw).unwrap_or_default(),
            name: str_at(raw, "name"),
            url: str_at(raw, "url"),
            follower_count: u64_at(raw, "follower_count"),
            pin_count: u64_at(raw, "pin_count"),
        }
    }
}

/// Strings at `path`, accepting a single string or an array of them
fn strings_at(raw: &JsonValue, path: &str) -> Vec<String> {
    match lookup(raw, path) {
        Some(JsonValue::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(JsonValue::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Engagement counters of a pin page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDetailCounts {
    pub reaction: u64,
    pub save: u64,
    pub share: u64,
    pub favorite: u64,
    pub repin: u64,
}

/// Every text field a pin page carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDetailText {
    pub alttext: String,
    pub autoalttext: String,
    pub description: String,
    pub closeup_description: String,
    pub title: String,
    pub grid_title: String,
}

/// The persisted view of a scraped pin page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDetailSummary {
    pub id: String,
    pub url: String,
    pub width: u64,
    pub height: u64,
    /// Outbound link
    pub link: String,
    /// Unix seconds, 0 when unknown
    pub created_at: i64,
    /// Visual annotation terms
    pub join: Vec<String>,
    pub dominant_color: String,
    pub count: PinDetailCounts,
    pub text: PinDetailText,
    pub category: Vec<String>,
}

impl PinDetailSummary {
    /// Build a summary from the pin object embedded in a pin page
    pub fn from_raw(raw: &JsonValue) -> Self {
        let id = match raw.get("entityId") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Self {
            id,
            url: str_at(raw, "imageSpec_orig.url"),
            width: u64_at(raw, "imageSpec_orig.width"),
            height: u64_at(raw, "imageSpec_orig.height"),
            link: str_at(raw, "link"),
            created_at: lookup(raw, "createdAt")
                .and_then(JsonValue::as_str)
                .and_then(parse_created_at)
                .unwrap_or(0),
            join: strings_at(raw, "pinJoin.visualAnnotation"),
            dominant_color: str_at(raw, "dominantColor"),
            count: PinDetailCounts {
                reaction: u64_at(raw, "totalReactionCount"),
                save: u64_at(raw, "aggregatedPinData.aggregatedStats.saves"),
                share: u64_at(raw, "shareCount"),
                favorite: u64_at(raw, "favoriteUserCount"),
                repin: u64_at(raw, "repinCount"),
            },
            text: PinDetailText {
                alttext: str_at(raw, "altText"),
                autoalttext: str_at(raw, "autoAltText"),
                description: str_at(raw, "description"),
                closeup_description: str_at(raw, "closeupDescription"),
                title: str_at(raw, "title"),
                grid_title: str_at(raw, "gridTitle"),
            },
            category: strings_at(raw, "category"),
        }
    }
}
