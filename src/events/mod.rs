//! Fetch event module
//!
//! Structured events emitted by the paginator and the retrying fetcher.
//!
//! # Overview
//!
//! Nothing in the engine logs through a global. Every component that reports
//! progress holds an [`EventSink`] handed to it at construction:
//! - `TracingSink` - Forwards events to `tracing` at the event's level (default)
//! - `MemorySink` - Records events for inspection in tests
//! - `NullSink` - Drops everything

mod sinks;
mod types;

pub use sinks::{EventSink, MemorySink, NullSink, SharedSink, TracingSink};
pub use types::FetchEvent;
