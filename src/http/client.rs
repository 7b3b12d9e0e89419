//! HTTP transport with session headers and rate limiting
//!
//! Provides the single-attempt transport used by the paginator:
//! - Session headers and cookies on every request
//! - Optional token bucket rate limiting
//! - Cache buster parameter on demand
//! - Error classification for retry decisions
//!
//! Retries are not done here. The caller wraps each send in a
//! [`RetryingFetcher`](crate::retry::RetryingFetcher).

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::request::RequestSpec;
use super::session::{Session, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::debug;

/// Default platform origin
pub const DEFAULT_BASE_URL: &str = "https://www.pinterest.com";

/// Longest error body kept in [`Error::HttpStatus`]
const MAX_ERROR_BODY: usize = 512;

/// Issues one request and returns the response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request once and return the raw body
    ///
    /// Fails with [`Error::Timeout`] or [`Error::Connection`] for transient
    /// network problems and with a terminal error for anything else.
    async fn send_text(&self, request: &RequestSpec) -> Result<String>;

    /// Send the request once and decode the body as JSON
    async fn send(&self, request: &RequestSpec) -> Result<JsonValue> {
        let text = self.send_text(request).await?;
        serde_json::from_str(&text).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Origin all relative paths resolve against
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
    /// Headers and cookies
    pub session: Session,
    /// Proxy URL for all requests
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            rate_limit: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session: Session::browser(None),
            proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the session
    pub fn session(mut self, session: Session) -> Self {
        self.config.session = session;
        self
    }

    /// Add a session header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.session = self.config.session.header(key, value);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Route requests through a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP transport backed by reqwest
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        if let Some(ref proxy) = config.proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }
        let client = builder.build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Final URL for a request, including the cache buster when asked
    pub fn resolve_url(&self, request: &RequestSpec) -> String {
        let mut url = request.url(&self.config.base_url);
        if request.cache_bust {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&format!("_={}", chrono::Utc::now().timestamp_millis()));
        }
        url
    }

    #[allow(clippy::cast_possible_truncation)]
    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else if e.is_connect() || e.is_body() {
            Error::connection(e.to_string())
        } else {
            Error::Http(e)
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send_text(&self, request: &RequestSpec) -> Result<String> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.resolve_url(request);
        let mut req = self.client.request(request.method.into(), &url);

        for (key, value) in self.config.session.headers() {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(cookie) = self.config.session.cookie_header() {
            req = req.header(COOKIE, cookie);
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        debug!("{} {}", request.method, url);
        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(Error::http_status(status.as_u16(), body));
        }

        response.text().await.map_err(|e| self.classify(e))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
