// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pinfeed
//!
//! Fetches paginated Pinterest collections (board feeds, account boards,
//! related pins, search results) until they are exhausted, retrying transient
//! failures on a fixed backoff ladder.
//!
//! ## Features
//!
//! - **One paginator for every endpoint**: adapters describe request shape,
//!   response envelope and end-of-feed rule
//! - **Fixed retry ladder**: literal sleeps of 15, 30, 40, 50 and 60 seconds
//! - **Partial results**: a run that gives up keeps what it already fetched
//! - **Cancellation**: a shared token or deadline stops runs mid-backoff
//! - **Concurrent collections**: independent runs behind a semaphore
//! - **Pin detail**: the full pin record scraped from its page
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pinfeed::adapter::BoardFeed;
//! use pinfeed::http::HttpClient;
//! use pinfeed::paginator::Paginator;
//!
//! #[tokio::main]
//! async fn main() -> pinfeed::Result<()> {
//!     let client = HttpClient::new()?;
//!     let outcome = Paginator::default()
//!         .collect(&BoardFeed::new("604538018670785766"), &client)
//!         .await;
//!
//!     println!("{} pins ({})", outcome.items.len(), outcome.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │              batch::fetch_all (Semaphore + JoinSet)        │
//! └─────────────────────────────┬──────────────────────────────┘
//!                               │ one run per collection
//! ┌─────────────────────────────┴──────────────────────────────┐
//! │        Paginator: cursor loop, dedupe, termination         │
//! └──────────┬───────────────────┬───────────────────┬─────────┘
//!            │                   │                   │
//! ┌──────────┴───────┐ ┌─────────┴────────┐ ┌────────┴─────────┐
//! │ ResourceAdapter  │ │ RetryingFetcher  │ │    EventSink     │
//! │ request/envelope │ │ ladder + cancel  │ │ tracing / memory │
//! └──────────────────┘ └─────────┬────────┘ └──────────────────┘
//!                                │
//!                     ┌──────────┴──────────┐
//!                     │ Transport (reqwest) │
//!                     └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cancellation token and deadline
pub mod cancel;

/// Structured fetch events and sinks
pub mod events;

/// Fixed-ladder retries
pub mod retry;

/// HTTP transport, session and rate limiting
pub mod http;

/// Pagination engine
pub mod paginator;

/// Endpoint adapters
pub mod adapter;

/// Concurrent collection runs
pub mod batch;

/// Pin and board summaries
pub mod normalize;

/// JSON collection output
pub mod output;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use adapter::ResourceAdapter;
pub use cancel::Cancellation;
pub use config::FetcherConfig;
pub use paginator::{Paginator, RunOutcome, RunStatus, Termination};
pub use retry::{RetryLadder, RetryingFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
