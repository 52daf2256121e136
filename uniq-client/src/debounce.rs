//! Debounce scheduling
//!
//! Runs an action only after its trigger has been quiet for a fixed
//! interval. Every new schedule cancels the pending one outright, so
//! only the last value of a rapid edit burst ever fires.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Schedules a task after a quiet interval; a new scheduling request
/// cancels the previous pending task.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` to run after the quiet interval, cancelling
    /// any previously scheduled action.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let previous = self.pending.lock().unwrap().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => action(),
                _ = token.cancelled() => {}
            }
        });
    }

    /// Cancel the pending action, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().unwrap().take() {
            pending.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
