//! Run cancellation: an explicit stop flag plus an optional wall-clock deadline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared stop signal checked by workers between codes.
///
/// Clones share the flag. The deadline is copied, so set it before cloning.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Token that is never cancelled until `cancel` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deadline `after` from now.
    pub fn with_deadline(mut self, after: Duration) -> Self {
        self.deadline = Some(Instant::now() + after);
        self
    }

    /// Stops the run at the next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether the run should stop dispatching.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `timeout` shortened to the time left before the deadline.
    pub fn clamp(&self, timeout: Duration) -> Duration {
        match self.deadline {
            Some(d) => timeout.min(d.saturating_duration_since(Instant::now())),
            None => timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn expired_deadline_cancels() {
        let token = CancelToken::new().with_deadline(Duration::ZERO);
        assert!(token.is_cancelled());
        assert_eq!(token.clamp(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn clamp_keeps_timeout_without_deadline() {
        let token = CancelToken::new();
        assert_eq!(token.clamp(Duration::from_secs(5)), Duration::from_secs(5));

        let far = CancelToken::new().with_deadline(Duration::from_secs(3600));
        assert_eq!(far.clamp(Duration::from_secs(5)), Duration::from_secs(5));
    }
}
