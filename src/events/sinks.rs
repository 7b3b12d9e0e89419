//! Event sink implementations

use super::types::FetchEvent;
use crate::types::LogLevel;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, trace, warn};

/// Receiver for fetch events
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn emit(&self, event: FetchEvent);
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn EventSink>;

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a shared tracing sink
    pub fn shared() -> SharedSink {
        Arc::new(Self)
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: FetchEvent) {
        let label = event.label();
        let message = event.message();
        match event.level() {
            LogLevel::Trace => trace!(collection = %label, "{message}"),
            LogLevel::Debug => debug!(collection = %label, "{message}"),
            LogLevel::Info => info!(collection = %label, "{message}"),
            LogLevel::Warn => warn!(collection = %label, "{message}"),
            LogLevel::Error => error!(collection = %label, "{message}"),
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: FetchEvent) {}
}

/// Records events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<FetchEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, in emission order
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events matching a predicate
    pub fn count(&self, predicate: impl Fn(&FetchEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
