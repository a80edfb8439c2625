//! Single-shot result channel of one session.

use bioprompt_core::effects::{CancelSignal, PromptSurface};
use bioprompt_core::TerminalResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

use crate::scheduler::SurfaceSlot;

/// Holds the terminal result of one session, the cancel flag shared with
/// its platform call and the slot of the surface the session draws on.
///
/// Owned by the caller's [`crate::AuthHandle`]s; the registry and the session
/// driver only hold weak or token-based references. The first delivered
/// result sticks, later deliveries are ignored.
pub struct ResultChannel {
    result_tx: watch::Sender<Option<TerminalResult>>,
    /// Set once the session's outcome is decided, possibly before delivery.
    sealed: AtomicBool,
    cancel: CancelSignal,
    surface: Arc<SurfaceSlot>,
}

impl ResultChannel {
    /// Create an unresolved channel.
    pub fn new(cancel: CancelSignal, surface: Arc<SurfaceSlot>) -> Self {
        let (result_tx, _result_rx) = watch::channel(None);
        Self {
            result_tx,
            sealed: AtomicBool::new(false),
            cancel,
            surface,
        }
    }

    /// Store the terminal result. Returns `false` if one was already stored.
    pub fn deliver(&self, result: TerminalResult) -> bool {
        self.seal();
        let delivered = self.result_tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(result);
            true
        });
        if !delivered {
            trace!("result channel already resolved; dropping delivery");
        }
        delivered
    }

    /// Whether the outcome is decided. May be `true` a dwell period before
    /// the result is delivered.
    pub fn is_terminal(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// The result, if it was delivered already.
    pub fn try_result(&self) -> Option<TerminalResult> {
        self.result_tx.borrow().clone()
    }

    /// Wait for the terminal result.
    pub async fn wait(&self) -> TerminalResult {
        let mut rx = self.result_tx.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a closed channel.
        rx.wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|result| result.clone())
            .unwrap_or(TerminalResult::Cancelled)
    }

    /// Request cancellation. No-op once the session is terminal.
    pub fn cancel(&self) -> bool {
        if self.is_terminal() {
            trace!("cancel after terminal result ignored");
            return false;
        }
        self.cancel.cancel()
    }

    /// Route the session's remaining display updates to `surface`.
    pub fn attach_surface(&self, surface: &Arc<dyn PromptSurface>) {
        self.surface.replace(surface);
    }

    /// Freeze the outcome ahead of delivery; later cancels are ignored.
    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub(crate) fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }
}

impl std::fmt::Debug for ResultChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultChannel")
            .field("result", &*self.result_tx.borrow())
            .field("sealed", &self.is_terminal())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioprompt_core::effects::{CancellationToken, HeadlessSurface};

    fn channel(cancel: CancelSignal) -> ResultChannel {
        let surface: Arc<dyn PromptSurface> = Arc::new(HeadlessSurface);
        ResultChannel::new(cancel, Arc::new(SurfaceSlot::new(&surface)))
    }

    #[tokio::test]
    async fn test_first_delivery_wins() {
        let channel = channel(CancelSignal::new());
        assert!(channel.deliver(TerminalResult::Success(None)));
        assert!(!channel.deliver(TerminalResult::Cancelled));
        assert_eq!(channel.wait().await, TerminalResult::Success(None));
    }

    #[tokio::test]
    async fn test_wait_resolves_on_later_delivery() {
        let channel = Arc::new(channel(CancelSignal::new()));
        let waiter = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.wait().await })
        };
        tokio::task::yield_now().await;
        channel.deliver(TerminalResult::Cancelled);
        assert_eq!(waiter.await.unwrap(), TerminalResult::Cancelled);
    }

    #[test]
    fn test_cancel_after_terminal_is_noop() {
        let cancel = CancelSignal::new();
        let channel = channel(cancel.clone());
        channel.deliver(TerminalResult::AuthFailed {
            code: 7,
            text: "locked".into(),
        });
        assert!(!channel.cancel());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_sealed_channel_ignores_cancel_before_delivery() {
        let cancel = CancelSignal::new();
        let channel = channel(cancel.clone());
        channel.seal();

        assert!(channel.is_terminal());
        assert!(channel.try_result().is_none());
        assert!(!channel.cancel());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_cancel_flags_platform_signal() {
        let cancel = CancelSignal::new();
        let channel = channel(cancel.clone());
        assert!(channel.cancel());
        assert!(!channel.cancel());
        assert!(cancel.is_cancelled());
    }
}
