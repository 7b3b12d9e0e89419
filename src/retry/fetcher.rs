//! Retrying fetcher

use super::ladder::RetryLadder;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::events::{FetchEvent, SharedSink, TracingSink};
use std::future::Future;

/// Runs a one-shot call under a [`RetryLadder`]
#[derive(Clone)]
pub struct RetryingFetcher {
    ladder: RetryLadder,
    sink: SharedSink,
    cancel: Cancellation,
}

impl RetryingFetcher {
    /// Create a fetcher that logs through `tracing`
    pub fn new(ladder: RetryLadder) -> Self {
        Self {
            ladder,
            sink: TracingSink::shared(),
            cancel: Cancellation::new(),
        }
    }

    /// Set the event sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Set the cancellation handle
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// The ladder in use
    pub fn ladder(&self) -> &RetryLadder {
        &self.ladder
    }

    /// Call `thunk` until it succeeds, fails terminally, or the ladder runs out
    ///
    /// The thunk is invoked once per attempt and must rebuild the request each
    /// time. Cancellation is checked before every attempt and interrupts both
    /// an in-flight call and a backoff sleep.
    pub async fn attempt<T, F, Fut>(&self, label: &str, mut thunk: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.ladder.max_attempts();
        let mut attempt = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::cancelled(label));
            }
            attempt += 1;

            let result = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(Error::cancelled(label)),
                result = thunk() => result,
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            let Some(delay) = self.ladder.delay_after(attempt) else {
                self.sink.emit(FetchEvent::RetryExhausted {
                    label: label.to_string(),
                    attempts: attempt,
                    error: err.to_string(),
                });
                return Err(Error::RetryExhausted {
                    label: label.to_string(),
                    attempts: attempt,
                    source: Box::new(err),
                });
            };

            self.sink.emit(FetchEvent::RetryScheduled {
                label: label.to_string(),
                attempt,
                max_attempts,
                delay,
                error: err.to_string(),
            });

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(Error::cancelled(label)),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("ladder", &self.ladder)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
