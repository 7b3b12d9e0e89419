//! Paginator module
//!
//! # Overview
//!
//! One generic loop serves every endpoint. Each call goes through the
//! [`RetryingFetcher`](crate::retry::RetryingFetcher); each batch is appended
//! to the run state and its token tested against the endpoint's
//! [`Termination`] rule.
//!
//! A failed call never propagates: the run stops and the items gathered so
//! far come back in a [`RunOutcome`] with [`RunStatus::PartialAborted`] and
//! the error attached.

mod engine;
mod types;

pub use engine::{Paginator, DEFAULT_MAX_PAGES};
pub use types::{
    canonical_token, Page, PageToken, PaginationState, RunOutcome, RunStatus, Termination,
    END_MARKER,
};

#[cfg(test)]
mod tests;
