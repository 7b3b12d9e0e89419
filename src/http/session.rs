//! Browser-like session headers and cookies

use std::path::Path;
use tracing::warn;

/// Referer sent with every request
pub const REFERER: &str = "https://www.pinterest.com/";

/// Default desktop browser user agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Headers and cookies attached to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
}

impl Session {
    /// An empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// The headers a browser sends to the resource endpoints
    pub fn browser(app_version: Option<&str>) -> Self {
        let mut session = Self::new()
            .header("Accept", "application/json, text/javascript, */*, q=0.01")
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Referer", REFERER)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("X-Pinterest-AppState", "active")
            .header("DNT", "1");
        if let Some(version) = app_version.filter(|v| !v.is_empty()) {
            session = session.header("X-APP-VERSION", version);
        }
        session
    }

    /// Add or replace a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    /// Add cookies from a `k=v; k2=v2` string
    #[must_use]
    pub fn cookies(mut self, raw: &str) -> Self {
        for (name, value) in parse_cookie_string(raw) {
            self.cookies.retain(|(n, _)| n != &name);
            self.cookies.push((name, value));
        }
        self
    }

    /// Add cookies read from a file holding a cookie string
    ///
    /// An unreadable file is logged and ignored.
    #[must_use]
    pub fn cookie_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => self.cookies(&raw),
            Err(e) => {
                warn!("Failed to read cookie file {}: {e}", path.display());
                self
            }
        }
    }

    /// Configured headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Configured cookies
    pub fn cookie_pairs(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Value for the `Cookie` header
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Parse a `k=v; k2="v2"` cookie string
///
/// Pairs without `=` or with an empty name are skipped; surrounding quotes on
/// values are removed.
pub fn parse_cookie_string(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
