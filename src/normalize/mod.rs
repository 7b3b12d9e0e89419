//! Normalisation of raw items
//!
//! Raw pins and boards carry dozens of fields; these summaries keep the ones
//! worth persisting. Missing fields fall back to empty values rather than
//! failing the item.

mod types;

pub use types::{
    parse_created_at, BoardSummary, PinCounts, PinDetailCounts, PinDetailSummary, PinDetailText,
    PinSummary, PinText,
};

use crate::types::JsonValue;
use std::collections::HashSet;

/// Original image URLs of raw pins, skipping pins without one
pub fn pin_urls(pins: &[JsonValue]) -> Vec<String> {
    pins.iter()
        .map(PinSummary::from_raw)
        .map(|pin| pin.url)
        .filter(|url| !url.is_empty())
        .collect()
}

/// Board ids in first-seen order without repeats
pub fn board_ids(boards: &[JsonValue]) -> Vec<String> {
    let mut seen = HashSet::new();
    boards
        .iter()
        .filter_map(crate::adapter::id_of)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests;
