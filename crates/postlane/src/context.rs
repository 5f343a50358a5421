//! Per-call deadline and cancellation.
//!
//! A [`Context`] is handed to every API operation. It optionally carries a
//! deadline and always carries a [`CancellationToken`]. Contexts are cheap to
//! clone; clones share the same token.
//!
//! ```
//! use postlane::Context;
//! use std::time::Duration;
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(5));
//! assert!(ctx.deadline().is_some());
//! ```

use crate::error::Interrupted;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation signal for one call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Context {
    /// A context with no deadline that is never cancelled unless asked.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Bounds the context to `timeout` from now.
    ///
    /// An earlier existing deadline is kept.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bounds the context to `deadline`. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Replaces the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Derives a context that is cancelled with this one but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    /// Cancels this context and its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// The cancellation token.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns true once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Why the context has ended, or `None` if it is still live.
    ///
    /// Cancellation wins over an expired deadline.
    #[must_use]
    pub fn interruption(&self) -> Option<Interrupted> {
        if self.token.is_cancelled() {
            Some(Interrupted::Cancelled)
        } else if self.deadline.is_some_and(|at| Instant::now() >= at) {
            Some(Interrupted::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Interrupted {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Interrupted::Cancelled,
                    () = tokio::time::sleep_until(at) => Interrupted::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                Interrupted::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert_eq!(ctx.interruption(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_deadline_wins() {
        let ctx = Context::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(10));
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_on_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(200));
        let start = Instant::now();
        assert_eq!(ctx.done().await, Interrupted::DeadlineExceeded);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(210));
        assert_eq!(ctx.interruption(), Some(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_done_on_cancel() {
        let ctx = Context::background();
        let mut done = task::spawn(ctx.done());
        assert_pending!(done.poll());

        ctx.cancel();
        assert!(done.is_woken());
        assert_ready_eq!(done.poll(), Interrupted::Cancelled);
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = Context::background();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert_eq!(other.interruption(), Some(Interrupted::Cancelled));
    }

    #[test]
    fn test_external_token() {
        let token = CancellationToken::new();
        let ctx = Context::background().with_cancellation(token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
