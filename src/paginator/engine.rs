//! Fetch-until-exhausted loop

use super::types::{Page, PaginationState, RunOutcome, RunStatus, Termination};
use crate::adapter::ResourceAdapter;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::events::{FetchEvent, SharedSink, TracingSink};
use crate::http::Transport;
use crate::retry::{RetryLadder, RetryingFetcher};
use std::future::Future;

/// Default cap on batches per run
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Drives one logical collection from the first page to the last
#[derive(Clone)]
pub struct Paginator {
    fetcher: RetryingFetcher,
    sink: SharedSink,
    cancel: Cancellation,
    max_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(RetryLadder::default())
    }
}

impl Paginator {
    /// Create a paginator with the given retry ladder
    pub fn new(ladder: RetryLadder) -> Self {
        let sink = TracingSink::shared();
        let cancel = Cancellation::new();
        Self {
            fetcher: RetryingFetcher::new(ladder)
                .with_sink(sink.clone())
                .with_cancellation(cancel.clone()),
            sink,
            cancel,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Set the event sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.fetcher = self.fetcher.with_sink(sink.clone());
        self.sink = sink;
        self
    }

    /// Set the cancellation handle
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.fetcher = self.fetcher.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Set the page cap
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// The retrying fetcher used for every call
    pub fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    /// Fetch every page of an adapter's collection
    pub async fn collect<A, T>(&self, adapter: &A, transport: &T) -> RunOutcome<A::Item>
    where
        A: ResourceAdapter + ?Sized,
        T: Transport + ?Sized,
    {
        let label = adapter.label();
        let termination = adapter.termination();
        self.drive(
            &label,
            &termination,
            |item| adapter.dedupe_key(item),
            move |cursor| async move {
                let request = adapter.build_request(cursor.as_deref());
                let raw = transport.send(&request).await?;
                adapter.parse_response(&raw)
            },
        )
        .await
    }

    /// Run the loop over an arbitrary batch-fetch function
    ///
    /// `fetch` receives the current cursor (unset on the first call) and
    /// returns one batch. It is wrapped in the retrying fetcher.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        termination: &Termination,
        fetch: F,
    ) -> RunOutcome<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        self.drive(label, termination, |_| None, fetch).await
    }

    async fn drive<T, K, F, Fut>(
        &self,
        label: &str,
        termination: &Termination,
        dedupe_key: K,
        fetch: F,
    ) -> RunOutcome<T>
    where
        K: Fn(&T) -> Option<String>,
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        self.sink.emit(FetchEvent::RunStarted {
            label: label.to_string(),
        });
        let mut state = PaginationState::new();

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled(label, state, Error::cancelled(label));
            }
            if state.pages >= self.max_pages {
                let err = Error::PageLimit {
                    label: label.to_string(),
                    max_pages: self.max_pages,
                };
                return self.aborted(label, state, err);
            }

            let cursor = state.token.clone();
            let page = match self
                .fetcher
                .attempt(label, || fetch(cursor.clone()))
                .await
            {
                Ok(page) => page,
                Err(e) if e.is_cancelled() => return self.cancelled(label, state, e),
                Err(e) => return self.aborted(label, state, e),
            };

            let done = termination.is_end(&page.token);
            let batch_len = page.len();
            state.advance(page, &dedupe_key);
            self.sink.emit(FetchEvent::PageFetched {
                label: label.to_string(),
                page: state.pages,
                batch_len,
                total: state.total(),
            });

            if done {
                return self.finish(label, state, RunStatus::Completed, None);
            }
        }
    }

    fn cancelled<T>(&self, label: &str, state: PaginationState<T>, err: Error) -> RunOutcome<T> {
        self.sink.emit(FetchEvent::Cancelled {
            label: label.to_string(),
            total: state.total(),
        });
        self.finish(label, state, RunStatus::Cancelled, Some(err))
    }

    fn aborted<T>(&self, label: &str, state: PaginationState<T>, err: Error) -> RunOutcome<T> {
        self.sink.emit(FetchEvent::FetchFailed {
            label: label.to_string(),
            total: state.total(),
            error: err.to_string(),
        });
        self.finish(label, state, RunStatus::PartialAborted, Some(err))
    }

    fn finish<T>(
        &self,
        label: &str,
        state: PaginationState<T>,
        status: RunStatus,
        error: Option<Error>,
    ) -> RunOutcome<T> {
        self.sink.emit(FetchEvent::RunFinished {
            label: label.to_string(),
            total: state.total(),
            pages: state.pages,
            status,
        });
        RunOutcome {
            items: state.items,
            status,
            pages: state.pages,
            error,
        }
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("fetcher", &self.fetcher)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}
