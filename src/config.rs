//! Fetcher configuration
//!
//! Every field is defaulted, so an empty YAML document is a valid
//! configuration:
//!
//! ```yaml
//! http:
//!   timeout_secs: 30
//!   app_version: "a1b2c3d"
//!   rate_limit:
//!     requests_per_second: 2
//! session:
//!   cookie_file: ~/.pinfeed/cookies.txt
//! retry:
//!   ladder_secs: [15, 30, 40, 50, 60]
//! pagination:
//!   page_size: 25
//! concurrency:
//!   max_concurrent: 5
//! output:
//!   dir: ./out
//!   pretty: true
//! ```

use crate::adapter::DEFAULT_PAGE_SIZE;
use crate::batch::DEFAULT_MAX_CONCURRENT;
use crate::error::{Error, Result};
use crate::events::SharedSink;
use crate::http::{
    HttpClientConfig, RateLimiterConfig, Session, DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};
use crate::output::JsonWriter;
use crate::paginator::{Paginator, DEFAULT_MAX_PAGES};
use crate::retry::{RetryLadder, DEFAULT_LADDER_SECS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest page size the related-pins endpoint accepts
const MAX_PAGE_SIZE: u32 = 50;

// ============================================================================
// Root
// ============================================================================

/// Complete fetcher configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Transport settings
    pub http: HttpSettings,

    /// Cookies
    pub session: SessionSettings,

    /// Retry ladder
    pub retry: RetrySettings,

    /// Page size and runaway guard
    pub pagination: PaginationSettings,

    /// Concurrency gate
    pub concurrency: ConcurrencySettings,

    /// Where collections are written
    pub output: OutputSettings,
}

impl FetcherConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML configuration string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserialises to unit, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.retry.ladder_secs.is_empty() {
            return Err(Error::invalid_value(
                "retry.ladder_secs",
                "ladder must have at least one entry",
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.pagination.page_size) {
            return Err(Error::invalid_value(
                "pagination.page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        if self.pagination.max_pages == 0 {
            return Err(Error::invalid_value(
                "pagination.max_pages",
                "must be at least 1",
            ));
        }
        if self.concurrency.max_concurrent == 0 {
            return Err(Error::invalid_value(
                "concurrency.max_concurrent",
                "must be at least 1",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be at least 1",
            ));
        }
        if let Some(limit) = &self.http.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "http.rate_limit.requests_per_second",
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }

    /// Session built from the browser defaults, extra headers and cookies
    pub fn session(&self) -> Session {
        let mut session = Session::browser(self.http.app_version.as_deref());
        for (key, value) in &self.http.headers {
            session = session.header(key, value);
        }
        match (&self.session.cookie_file, &self.session.cookie) {
            (Some(path), _) => session.cookie_file(path),
            (None, Some(cookie)) => session.cookies(cookie),
            (None, None) => session,
        }
    }

    /// Transport configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.http.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .user_agent(&self.http.user_agent)
            .session(self.session());
        if let Some(limit) = self.http.rate_limit {
            builder = builder.rate_limit(limit);
        }
        if let Some(proxy) = &self.http.proxy {
            builder = builder.proxy(proxy);
        }
        builder.build()
    }

    /// Retry ladder
    pub fn ladder(&self) -> Result<RetryLadder> {
        RetryLadder::from_secs(&self.retry.ladder_secs)
    }

    /// Paginator wired to `sink`
    pub fn paginator(&self, sink: SharedSink) -> Result<Paginator> {
        Ok(Paginator::new(self.ladder()?)
            .with_sink(sink)
            .with_max_pages(self.pagination.max_pages))
    }

    /// Collection writer
    pub fn writer(&self) -> JsonWriter {
        JsonWriter::new(&self.output.dir).pretty(self.output.pretty)
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Origin relative paths resolve against
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Web app version sent as `X-APP-VERSION`
    pub app_version: Option<String>,

    /// Extra headers, replacing browser defaults of the same name
    pub headers: BTreeMap<String, String>,

    /// Token bucket limit; unlimited when absent
    pub rate_limit: Option<RateLimiterConfig>,

    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            app_version: None,
            headers: BTreeMap::new(),
            rate_limit: None,
            proxy: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

// ============================================================================
// Session
// ============================================================================

/// Cookie sources
///
/// The file takes precedence: when `cookie_file` is set the inline `cookie`
/// is ignored, even if the file cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Inline `k=v; k2=v2` cookie string
    pub cookie: Option<String>,

    /// File holding a cookie string
    pub cookie_file: Option<PathBuf>,
}

// ============================================================================
// Retry
// ============================================================================

/// Retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Seconds slept after each failed attempt
    pub ladder_secs: Vec<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            ladder_secs: DEFAULT_LADDER_SECS.to_vec(),
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Items requested per page
    pub page_size: u32,

    /// Pages fetched before a run is aborted
    pub max_pages: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

// ============================================================================
// Concurrency
// ============================================================================

/// Concurrency settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencySettings {
    /// Collections fetched at once
    pub max_concurrent: usize,
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving `<id>.json` files
    pub dir: PathBuf,

    /// Indent written JSON
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(FetcherConfig::from_yaml("").unwrap(), FetcherConfig::default());
        assert_eq!(
            FetcherConfig::from_yaml("{}").unwrap(),
            FetcherConfig::default()
        );
    }

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.http.base_url, "https://www.pinterest.com");
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.retry.ladder_secs, vec![15, 30, 40, 50, 60]);
        assert_eq!(config.pagination.page_size, 25);
        assert_eq!(config.pagination.max_pages, 10_000);
        assert_eq!(config.concurrency.max_concurrent, 5);
        assert!(config.http.rate_limit.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = FetcherConfig::from_yaml(
            r"
http:
  timeout_secs: 10
  app_version: abc123
  headers:
    Accept-Language: de-DE
  rate_limit:
    requests_per_second: 3
retry:
  ladder_secs: [1, 2]
output:
  dir: /tmp/pins
  pretty: true
",
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.http.rate_limit,
            Some(RateLimiterConfig::new(3, 1))
        );
        assert_eq!(config.retry.ladder_secs, vec![1, 2]);
        assert_eq!(config.pagination.page_size, 25);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/pins"));
        assert!(config.output.pretty);

        let ladder = config.ladder().unwrap();
        assert_eq!(ladder.max_attempts(), 2);
    }

    #[test]
    fn test_session_headers_and_cookies() {
        let config = FetcherConfig::from_yaml(
            r#"
http:
  app_version: abc123
  headers:
    accept-language: de-DE
session:
  cookie: "csrftoken=xyz; _auth=1"
"#,
        )
        .unwrap();

        let session = config.session();
        let headers = session.headers();
        assert!(headers
            .iter()
            .any(|(k, v)| k == "X-APP-VERSION" && v == "abc123"));
        let languages: Vec<_> = headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("accept-language"))
            .collect();
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].1, "de-DE");
        assert_eq!(
            session.cookie_header().as_deref(),
            Some("csrftoken=xyz; _auth=1")
        );
    }

    #[test]
    fn test_cookie_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sess=from-file").unwrap();

        let mut config = FetcherConfig::default();
        config.session.cookie = Some("sess=inline; extra=1".to_string());
        config.session.cookie_file = Some(file.path().to_path_buf());
        assert_eq!(
            config.session().cookie_header().as_deref(),
            Some("sess=from-file")
        );

        config.session.cookie_file = Some(PathBuf::from("/nonexistent/cookies.txt"));
        assert_eq!(config.session().cookie_header(), None);

        config.session.cookie_file = None;
        assert_eq!(
            config.session().cookie_header().as_deref(),
            Some("sess=inline; extra=1")
        );
    }

    #[test]
    fn test_rejects_empty_ladder() {
        let err = FetcherConfig::from_yaml("retry:\n  ladder_secs: []\n").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "retry.ladder_secs"
        ));
    }

    #[test]
    fn test_rejects_page_size_out_of_range() {
        for size in [0, 51] {
            let yaml = format!("pagination:\n  page_size: {size}\n");
            assert!(FetcherConfig::from_yaml(&yaml).is_err(), "size {size}");
        }
        assert!(FetcherConfig::from_yaml("pagination:\n  page_size: 50\n").is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let err =
            FetcherConfig::from_yaml("concurrency:\n  max_concurrent: 0\n").unwrap_err();
        assert!(err.to_string().contains("concurrency.max_concurrent"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = FetcherConfig::from_yaml("http: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "concurrency:\n  max_concurrent: 2").unwrap();

        let config = FetcherConfig::load(file.path()).unwrap();
        assert_eq!(config.concurrency.max_concurrent, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FetcherConfig::load("/nonexistent/pinfeed.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_http_client_config() {
        let mut config = FetcherConfig::default();
        config.http.timeout_secs = 5;
        config.http.proxy = Some("http://127.0.0.1:8080".to_string());

        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(http.base_url, DEFAULT_BASE_URL);
    }
}
