//! Response envelope navigation
//!
//! Dot paths with optional array indexes, e.g.
//! `resource.options.bookmarks[0]` or `data.connection.edges[-1]`.

use crate::error::{Error, Result};
use crate::paginator::{PageToken, END_MARKER};
use serde_json::Value;

/// Path to the bookmark most resource endpoints echo back
pub const OPTIONS_BOOKMARK: &str = "resource.options.bookmarks[0]";

/// Look up a value by path
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;

    for part in path.split('.').filter(|p| !p.is_empty()) {
        let Some(bracket) = part.find('[') else {
            current = current.get(part)?;
            continue;
        };

        let name = &part[..bracket];
        if !name.is_empty() {
            current = current.get(name)?;
        }

        let index: i64 = part[bracket + 1..].strip_suffix(']')?.parse().ok()?;
        let arr = current.as_array()?;
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let idx = if index < 0 {
            usize::try_from(arr.len() as i64 + index).ok()?
        } else {
            index as usize
        };
        current = arr.get(idx)?;
    }

    Some(current)
}

/// Look up a value that must be present
pub fn require<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    lookup(value, path).ok_or_else(|| Error::parse(path, "field missing"))
}

/// Clone the array at `path`
pub fn require_items(value: &Value, path: &str) -> Result<Vec<Value>> {
    match require(value, path)? {
        Value::Array(items) => Ok(items.clone()),
        other => Err(Error::parse(
            path,
            format!("expected an array, found {}", type_name(other)),
        )),
    }
}

/// Bookmark at [`OPTIONS_BOOKMARK`]; a missing bookmark is an error
pub fn options_bookmark(value: &Value) -> Result<PageToken> {
    require(value, OPTIONS_BOOKMARK).map(|v| PageToken::from_value(Some(v)))
}

/// Bookmark at [`OPTIONS_BOOKMARK`]; a missing `bookmarks` field means the
/// feed is over
pub fn options_bookmark_or_end(value: &Value) -> Result<PageToken> {
    let options = require(value, "resource.options")?;
    match options.get("bookmarks") {
        None => Ok(PageToken::token(END_MARKER)),
        Some(_) => options_bookmark(value),
    }
}

/// Stringify an id that may be a JSON string or number
pub fn id_of(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
