//! Backoff ladder

use crate::error::{Error, Result};
use std::time::Duration;

/// Default ladder in seconds
pub const DEFAULT_LADDER_SECS: [u64; 5] = [15, 30, 40, 50, 60];

/// Ordered backoff sleeps; its length is the maximum number of attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryLadder {
    delays: Vec<Duration>,
}

impl Default for RetryLadder {
    fn default() -> Self {
        Self {
            delays: DEFAULT_LADDER_SECS
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
        }
    }
}

impl RetryLadder {
    /// Create a ladder from explicit delays
    pub fn new(delays: Vec<Duration>) -> Result<Self> {
        if delays.is_empty() {
            return Err(Error::invalid_value(
                "retry.ladder_secs",
                "ladder must contain at least one step",
            ));
        }
        Ok(Self { delays })
    }

    /// Create a ladder from whole seconds
    pub fn from_secs(secs: &[u64]) -> Result<Self> {
        Self::new(secs.iter().map(|s| Duration::from_secs(*s)).collect())
    }

    /// Single attempt, no retries
    pub fn single() -> Self {
        Self {
            delays: vec![Duration::ZERO],
        }
    }

    /// Maximum number of attempts
    pub fn max_attempts(&self) -> usize {
        self.delays.len()
    }

    /// Sleep after failed attempt `attempt` (1-based), or `None` when the
    /// ladder is exhausted
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt == 0 || attempt >= self.delays.len() {
            return None;
        }
        self.delays.get(attempt - 1).copied()
    }

    /// Total sleep when every attempt fails
    pub fn total_wait(&self) -> Duration {
        let n = self.delays.len().saturating_sub(1);
        self.delays[..n].iter().sum()
    }

    /// The configured delays
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}
