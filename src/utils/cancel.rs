//! Cancellation utilities
//!
//! Provides first-class cancellation handles for long-running operations.
//! The provider API offers no way to abort a submitted job, so cancelling only
//! stops local waiting; the remote operation keeps running until it finishes.

use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Request cancellation. Pollers observing this handle stop before their
    /// next wait, or immediately if they are currently waiting.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_the_flag() {
        let handle = new_cancel_handle();
        let observer = handle.clone();
        assert!(!observer.is_cancelled());
        handle.cancel();
        assert!(observer.is_cancelled());
        observer.cancelled().await;
    }
}
