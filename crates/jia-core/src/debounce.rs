//! Debounce helper for keystroke-driven filtering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// Default window for the customer-list filter.
pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid query edits: only the most recent caller of `settle`
/// survives the window.
#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl QueryDebouncer {
    /// Create a debouncer with the given window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Wait out the window; returns false when a newer edit superseded
    /// this one in the meantime.
    pub async fn settle(&self) -> bool {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        sleep(self.delay).await;
        self.generation.load(Ordering::SeqCst) == token
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryDebouncer;

    #[tokio::test(start_paused = true)]
    async fn lone_edit_settles() {
        let debouncer = QueryDebouncer::default();
        assert!(debouncer.settle().await);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_edit_is_dropped() {
        let debouncer = QueryDebouncer::default();
        let (first, second) = tokio::join!(debouncer.settle(), debouncer.settle());
        assert!(!first);
        assert!(second);
    }
}
