//! Cancellation signal passed through the mediator into handlers.
//!
//! The server creates one [`CancellationToken`] per request and cancels it
//! when the request times out or the server shuts down. The mediator never
//! inspects it; handlers that do asynchronous work may observe it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// A cloneable signal used to cancel in-flight work.
///
/// All clones observe the same state: cancelling one cancels them all.
///
/// # Example
///
/// ```
/// use herald_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl CancellationToken {
    /// Creates a new, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Cancels the token. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // No receivers is fine
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` if the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Waits until the token is cancelled.
    ///
    /// Completes immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        // Subscribe before checking the flag so a concurrent cancel is not missed
        let mut receiver = self.sender.subscribe();
        if self.is_cancelled() {
            return;
        }
        // A closed or lagged channel also ends the wait
        let _ = receiver.recv().await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
