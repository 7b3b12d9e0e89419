//! JSON collection writer

use crate::error::{Error, Result, ResultExt};
use regex::Regex;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Runs of whitespace collapsed to one space
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Make a collection id safe to use as a file name
///
/// Drops `< > ? *`, turns `"` into `'`, maps path and extension separators
/// (`/ \ | : .`) to `_`, and collapses whitespace. An id that sanitises to
/// nothing becomes `_`.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '?' | '*'))
        .map(|c| match c {
            '"' => '\'',
            '/' | '\\' | '|' | ':' | '.' => '_',
            other => other,
        })
        .collect();
    let collapsed = WHITESPACE.replace_all(cleaned.trim(), " ");
    if collapsed.is_empty() {
        "_".to_string()
    } else {
        collapsed.into_owned()
    }
}

/// Configuration for collection output
#[derive(Debug, Clone, Default)]
pub struct JsonWriterConfig {
    /// Indent the JSON
    pub pretty: bool,
}

/// Writes each collection to `<dir>/<sanitised id>.json`
#[derive(Debug, Clone)]
pub struct JsonWriter {
    dir: PathBuf,
    config: JsonWriterConfig,
}

impl JsonWriter {
    /// Create a writer rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: JsonWriterConfig::default(),
        }
    }

    /// Indent written JSON
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a collection id
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(id)))
    }

    /// Write `items` as one JSON array, creating the directory if needed
    ///
    /// The file is written next to its target and renamed into place, so a
    /// reader never sees a half-written file.
    pub fn write<T: Serialize>(&self, id: &str, items: &[T]) -> Result<PathBuf> {
        self.write_value(id, items)
    }

    /// Write any serializable value, e.g. a single pin detail
    pub fn write_value<T: Serialize + ?Sized>(&self, id: &str, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::output(format!(
                "Failed to create output directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        {
            let mut out = BufWriter::new(
                File::create(&tmp)
                    .with_context(|| format!("Failed to create {}", tmp.display()))?,
            );
            if self.config.pretty {
                serde_json::to_writer_pretty(&mut out, value)?;
            } else {
                serde_json::to_writer(&mut out, value)?;
            }
            out.flush()?;
        }
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move {} into place", path.display()))?;
        Ok(path)
    }
}

/// Write one collection with default settings
pub fn write_collection<T: Serialize>(dir: &Path, id: &str, items: &[T]) -> Result<PathBuf> {
    JsonWriter::new(dir).write(id, items)
}
