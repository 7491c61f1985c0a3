//! Shutdown-aware execution context
//!
//! Every task executed by the pool receives a [`CancellationToken`] that
//! is cancelled when the pool begins shutting down. Processors can poll
//! it in long loops, or use [`CancellationToken::check`] for `?`-style
//! early returns.
//!
//! # Example
//!
//! ```rust
//! use message_worker::{CancellationToken, TaskResult};
//!
//! fn process_batch(ctx: &CancellationToken, items: &[u64]) -> TaskResult {
//!     for item in items {
//!         ctx.check()?;
//!         // Do work...
//!         let _ = item;
//!     }
//!     Ok(())
//! }
//! ```

use crate::core::{Result, WorkerError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reason for cancellation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationReason {
    /// Explicitly cancelled via `cancel()`
    Manual,
    /// Cancelled because the owning pool is shutting down
    Shutdown,
}

impl std::fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancellationReason::Manual => write!(f, "manually cancelled"),
            CancellationReason::Shutdown => write!(f, "pool is shutting down"),
        }
    }
}

struct CancellationTokenInner {
    cancelled: AtomicBool,
    reason: RwLock<Option<CancellationReason>>,
}

/// A thread-safe cancellation flag shared between a pool and its tasks.
///
/// Cloning is cheap; all clones observe the same state. Cancellation is
/// idempotent and only the first call records a reason.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationTokenInner>,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled)
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationTokenInner {
                cancelled: AtomicBool::new(false),
                reason: RwLock::new(None),
            }),
        }
    }

    /// Cancel this token with the default reason (Manual)
    pub fn cancel(&self) {
        self.cancel_with_reason(CancellationReason::Manual);
    }

    /// Cancel this token with a specific reason.
    ///
    /// Only the first cancellation records its reason; later calls are
    /// no-ops.
    pub fn cancel_with_reason(&self, reason: CancellationReason) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        *self.inner.reason.write() = Some(reason);
    }

    /// Check if this token has been cancelled.
    ///
    /// Lock-free, suitable for frequent checking in hot loops.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Returns the cancellation reason, or `None` if not cancelled
    pub fn reason(&self) -> Option<CancellationReason> {
        self.inner.reason.read().clone()
    }

    /// Returns an error if cancelled, `Ok(())` otherwise.
    ///
    /// Convenience for ergonomic early returns in processors using `?`.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            let reason = self
                .reason()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Err(WorkerError::cancelled(reason))
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_token_creation() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
    }

    #[test]
    fn test_token_cancel_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_first_reason_wins() {
        let token = CancellationToken::new();
        token.cancel_with_reason(CancellationReason::Shutdown);
        token.cancel_with_reason(CancellationReason::Manual);
        assert_eq!(token.reason(), Some(CancellationReason::Shutdown));
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_check() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());

        token.cancel_with_reason(CancellationReason::Shutdown);
        let err = token.check().unwrap_err();
        assert!(err.to_string().contains("shutting down"));
    }

    #[test]
    fn test_cancellation_observed_across_threads() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        let handle = thread::spawn(move || {
            for _ in 0..100 {
                if token_clone.is_cancelled() {
                    return true;
                }
                thread::sleep(Duration::from_millis(10));
            }
            false
        });

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(CancellationReason::Manual.to_string(), "manually cancelled");
        assert_eq!(
            CancellationReason::Shutdown.to_string(),
            "pool is shutting down"
        );
    }
}
