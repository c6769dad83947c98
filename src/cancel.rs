//! Level-triggered cancellation shared by the input thread, the dispatch loop
//! and command handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// A cloneable cancellation signal. Once fired it stays fired.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Fire the token. Calling it again has no further effect.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolve once the token has fired, immediately if it already has.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Derive a token that fires with this one but can also be fired on its own.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn child(&self) -> Self {
        let child = Self::new();
        if self.is_cancelled() {
            child.cancel();
            return child;
        }
        let parent = self.clone();
        let linked = child.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = parent.cancelled() => linked.cancel(),
                _ = linked.cancelled() => {}
            }
        });
        child
    }

    /// Derive a token that additionally fires after `timeout`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let child = self.child();
        let linked = child.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    log::info!("deadline of {:?} reached", timeout);
                    linked.cancel();
                }
                _ = linked.cancelled() => {}
            }
        });
        child
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
