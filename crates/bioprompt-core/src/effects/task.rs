//! Cooperative cancellation shared between a session and its platform call.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative cancellation token.
#[async_trait]
pub trait CancellationToken: Send + Sync {
    /// Resolves when cancellation is requested.
    async fn cancelled(&self);

    /// Non-blocking cancellation check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag for one session.
///
/// Cloned into the backend at session start; every clone observes the same
/// flag. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Unflagged signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation. Returns `true` if this call flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.tx.send_replace(true)
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CancellationToken for CancelSignal {
    async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns once flagged.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_is_shared_and_idempotent() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_cancelled());

        assert!(signal.cancel());
        assert!(!signal.cancel());
        assert!(clone.is_cancelled());

        clone.cancelled().await;
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let signal = CancelSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };
        tokio::task::yield_now().await;
        signal.cancel();
        assert!(waiter.await.is_ok());
    }
}
