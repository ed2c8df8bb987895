//! Coalesces bursts of input into a single action.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Delay used by search inputs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Lets only the last of several rapid calls through.
///
/// Each call to [`settle`](Self::settle) waits for the delay and reports
/// whether no newer call arrived in the meantime. Clones share the same
/// sequence.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay. Returns `true` if this was the last call.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Runs `action` after the delay unless a newer call superseded this one.
    pub async fn run<F, Fut>(&self, action: F) -> Option<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        if self.settle().await {
            Some(action().await)
        } else {
            None
        }
    }
}
