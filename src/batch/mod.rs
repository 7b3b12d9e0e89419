//! Concurrent collection runs
//!
//! Independent collections run as separate tasks in a [`JoinSet`]; a
//! [`Semaphore`] caps how many are inside the paginator at once. Runs share
//! the transport and nothing else. Pin details go through the same gate.

use crate::adapter::{PinDetail, ResourceAdapter};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::paginator::{Paginator, RunOutcome, RunStatus};
use crate::retry::RetryingFetcher;
use crate::types::JsonValue;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Default number of collections fetched at once
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Fetch several collections, at most `max_concurrent` at a time
///
/// Outcomes come back in the order of `adapters`. A run whose task panics is
/// reported as [`RunStatus::PartialAborted`] with no items.
pub async fn fetch_all<A>(
    paginator: &Paginator,
    transport: Arc<dyn Transport>,
    adapters: Vec<A>,
    max_concurrent: usize,
) -> Vec<RunOutcome<A::Item>>
where
    A: ResourceAdapter + 'static,
    A::Item: 'static,
{
    let jobs = adapters.into_iter().map(|adapter| {
        let paginator = paginator.clone();
        let transport = transport.clone();
        let label = adapter.label();
        let run = async move {
            debug!("Starting {}", adapter.label());
            paginator.collect(&adapter, transport.as_ref()).await
        };
        (label, run)
    });

    gated(jobs, max_concurrent, |label| RunOutcome {
        items: Vec::new(),
        status: RunStatus::PartialAborted,
        pages: 0,
        error: Some(unfinished(&label)),
    })
    .await
}

/// Fetch several pin details, at most `max_concurrent` at a time
///
/// Results come back in the order of `details`.
pub async fn fetch_details(
    fetcher: &RetryingFetcher,
    transport: Arc<dyn Transport>,
    details: Vec<PinDetail>,
    max_concurrent: usize,
) -> Vec<Result<JsonValue>> {
    let jobs = details.into_iter().map(|detail| {
        let fetcher = fetcher.clone();
        let transport = transport.clone();
        let label = detail.label();
        let run = async move {
            debug!("Starting {}", detail.label());
            detail.fetch(&fetcher, transport.as_ref()).await
        };
        (label, run)
    });

    gated(jobs, max_concurrent, |label| Err(unfinished(&label))).await
}

fn unfinished(label: &str) -> Error {
    Error::Other(format!("fetch task for {label} did not finish"))
}

/// Run labelled futures under a semaphore, collecting results in input order
///
/// `lost` fills the slot of a task that panicked.
async fn gated<T, Fut>(
    jobs: impl IntoIterator<Item = (String, Fut)>,
    max_concurrent: usize,
    lost: impl Fn(String) -> T,
) -> Vec<T>
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut join_set = JoinSet::new();
    let mut labels = Vec::new();

    for (index, (label, job)) in jobs.into_iter().enumerate() {
        labels.push(label);
        let semaphore = semaphore.clone();

        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            (index, job.await)
        });
    }

    let mut slots: Vec<Option<T>> = (0..labels.len()).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => error!("Fetch task failed: {e}"),
        }
    }

    slots
        .into_iter()
        .zip(labels)
        .map(|(slot, label)| slot.unwrap_or_else(|| lost(label)))
        .collect()
}
