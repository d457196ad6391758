use std::sync::Arc;

use tokio::sync::watch;

/// One-shot broadcast signal
///
/// A signal starts unset and can be set exactly once. Any number of
/// clones can observe or wait for it. The same type is used for
/// cancellation, the flushed acknowledgment of a display driver, and the
/// done latch of a bar.
///
/// ```rust
/// let cancel = gauge::Signal::new();
/// let observer = cancel.clone();
/// assert!(!observer.signaled());
/// assert!(cancel.signal());
/// assert!(!cancel.signal()); // only the first call fires
/// assert!(observer.signaled());
/// ```
#[derive(Debug, Clone)]
pub struct Signal {
    inner: Arc<watch::Sender<bool>>,
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal {
    /// Create an unset signal
    pub fn new() -> Self {
        let (send, _) = watch::channel(false);
        Self {
            inner: Arc::new(send),
        }
    }

    /// Create a signal that is already set
    pub fn new_signaled() -> Self {
        let signal = Self::new();
        signal.signal();
        signal
    }

    /// Set the signal. Returns `true` if this call is the one that set it
    pub fn signal(&self) -> bool {
        self.inner.send_if_modified(|set| {
            if *set {
                return false;
            }
            *set = true;
            true
        })
    }

    /// Check if the signal is set, without waiting
    pub fn signaled(&self) -> bool {
        *self.inner.borrow()
    }

    /// Wait for the signal to be set
    pub async fn co_wait(&self) {
        let mut recv = self.inner.subscribe();
        // _: the sender is owned by self, it cannot be dropped while waiting
        let _ = recv.wait_for(|set| *set).await;
    }

    /// Block the current thread until the signal is set.
    ///
    /// Use [`co_wait`](Self::co_wait) inside async contexts.
    pub fn wait(&self) {
        if self.signaled() {
            return;
        }
        crate::co::block(self.co_wait())
    }
}

/// Counter of bars that have not terminated yet
///
/// Shared by all bars of one display. Each spawned bar adds one, and the
/// bar's actor subtracts one when it terminates. A display driver can
/// wait for the count to reach zero to know every bar is finished.
#[derive(Debug, Clone)]
pub struct CompletionCounter {
    inner: Arc<watch::Sender<usize>>,
}

impl Default for CompletionCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionCounter {
    pub fn new() -> Self {
        let (send, _) = watch::channel(0);
        Self {
            inner: Arc::new(send),
        }
    }

    /// Add `n` pending bars
    pub fn add(&self, n: usize) {
        self.inner.send_modify(|count| *count = count.saturating_add(n));
    }

    /// Mark one bar as finished
    pub fn done(&self) {
        self.inner.send_modify(|count| *count = count.saturating_sub(1));
    }

    /// Number of bars not finished yet
    pub fn count(&self) -> usize {
        *self.inner.borrow()
    }

    /// Wait for the count to reach zero
    pub async fn co_wait(&self) {
        let mut recv = self.inner.subscribe();
        let _ = recv.wait_for(|count| *count == 0).await;
    }

    /// Block the current thread until the count reaches zero
    pub fn wait(&self) {
        if self.count() == 0 {
            return;
        }
        crate::co::block(self.co_wait())
    }
}
