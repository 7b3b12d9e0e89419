//! Cancellation handle shared by every run
//!
//! Combines a [`CancellationToken`] with an optional deadline. Clones share the
//! same token, so cancelling one handle stops every run holding a clone.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Create a handle that never fires on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Underlying token
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the token fired or the deadline passed
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the token fires or the deadline passes
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_handle_is_live() {
        assert!(!Cancellation::new().is_cancelled());
    }

    #[test]
    fn test_clones_share_token() {
        let cancel = Cancellation::new();
        let clone = cancel.clone();
        cancel.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires() {
        let cancel = Cancellation::new().with_timeout(Duration::from_secs(10));
        assert!(!cancel.is_cancelled());

        let start = Instant::now();
        cancel.cancelled().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_token_wakes_waiter() {
        let token = CancellationToken::new();
        let cancel = Cancellation::with_token(token.clone());
        let waiter = tokio::spawn(async move { cancel.cancelled().await });
        token.cancel();
        waiter.await.unwrap();
    }
}
