//! Event types
//!
//! One variant per observable step of a paginated run.

use crate::paginator::RunStatus;
use crate::types::LogLevel;
use std::time::Duration;

/// An event emitted while fetching a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// A paginated run is starting
    RunStarted {
        /// Collection label
        label: String,
    },
    /// A batch arrived and was appended
    PageFetched {
        /// Collection label
        label: String,
        /// 1-based page number
        page: usize,
        /// Items in this batch
        batch_len: usize,
        /// Items accumulated so far
        total: usize,
    },
    /// A transient failure will be retried after `delay`
    RetryScheduled {
        /// Collection label
        label: String,
        /// Attempt that just failed (1-based)
        attempt: usize,
        /// Ladder length
        max_attempts: usize,
        /// Sleep before the next attempt
        delay: Duration,
        /// Failure description
        error: String,
    },
    /// Every attempt on the ladder failed
    RetryExhausted {
        /// Collection label
        label: String,
        /// Attempts made
        attempts: usize,
        /// Last failure description
        error: String,
    },
    /// A terminal failure stopped the run
    FetchFailed {
        /// Collection label
        label: String,
        /// Items kept from earlier batches
        total: usize,
        /// Failure description
        error: String,
    },
    /// Cancellation or the deadline stopped the run
    Cancelled {
        /// Collection label
        label: String,
        /// Items kept from earlier batches
        total: usize,
    },
    /// The run returned
    RunFinished {
        /// Collection label
        label: String,
        /// Items returned
        total: usize,
        /// Pages fetched
        pages: usize,
        /// How the run ended
        status: RunStatus,
    },
}

impl FetchEvent {
    /// The collection this event belongs to
    pub fn label(&self) -> &str {
        match self {
            Self::RunStarted { label }
            | Self::PageFetched { label, .. }
            | Self::RetryScheduled { label, .. }
            | Self::RetryExhausted { label, .. }
            | Self::FetchFailed { label, .. }
            | Self::Cancelled { label, .. }
            | Self::RunFinished { label, .. } => label,
        }
    }

    /// Severity of this event
    pub fn level(&self) -> LogLevel {
        match self {
            Self::RunStarted { .. } => LogLevel::Debug,
            Self::PageFetched { .. } => LogLevel::Debug,
            Self::RetryScheduled { .. } | Self::Cancelled { .. } => LogLevel::Warn,
            Self::RetryExhausted { .. } | Self::FetchFailed { .. } => LogLevel::Error,
            Self::RunFinished { status, .. } => {
                if status.is_completed() {
                    LogLevel::Info
                } else {
                    LogLevel::Warn
                }
            }
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Self::RunStarted { label } => format!("Fetching {label}"),
            Self::PageFetched {
                label,
                page,
                batch_len,
                total,
            } => format!("{label}: page {page} returned {batch_len} items ({total} total)"),
            Self::RetryScheduled {
                label,
                attempt,
                max_attempts,
                delay,
                error,
            } => format!(
                "{label}: attempt {attempt}/{max_attempts} failed ({error}), retrying in {}s",
                delay.as_secs_f64()
            ),
            Self::RetryExhausted {
                label,
                attempts,
                error,
            } => format!("{label}: giving up after {attempts} attempts ({error})"),
            Self::FetchFailed {
                label,
                total,
                error,
            } => format!("{label}: fetch failed, keeping {total} items: {error}"),
            Self::Cancelled { label, total } => {
                format!("{label}: cancelled, keeping {total} items")
            }
            Self::RunFinished {
                label,
                total,
                pages,
                status,
            } => format!("{label}: {status} with {total} items in {pages} pages"),
        }
    }

    /// Check if this is a retry event
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::RetryScheduled { .. })
    }
}
