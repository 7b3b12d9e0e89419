//! HTTP transport module
//!
//! Sends one request per call with browser-like session headers.
//!
//! # Features
//!
//! - **Transport trait**: The seam the paginator talks through, mockable in tests
//! - **Session**: Default headers plus cookies from a string or file
//! - **Rate Limiting**: Optional token bucket using governor
//! - **Classification**: Timeouts and connection failures map to retryable errors

mod client;
mod rate_limit;
mod request;
mod session;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, Transport, DEFAULT_BASE_URL,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::RequestSpec;
pub use session::{parse_cookie_string, Session, DEFAULT_USER_AGENT, REFERER};
