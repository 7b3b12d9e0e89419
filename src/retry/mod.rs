//! Retry module
//!
//! Wraps a single network call with a fixed ladder of backoff sleeps.
//!
//! The ladder is not exponential: each element is the literal sleep taken
//! after the matching failed attempt, and its length caps the number of
//! attempts. Only transient failures ([`Error::is_retryable`]) are retried.
//!
//! [`Error::is_retryable`]: crate::error::Error::is_retryable

mod fetcher;
mod ladder;

pub use fetcher::RetryingFetcher;
pub use ladder::{RetryLadder, DEFAULT_LADDER_SECS};
