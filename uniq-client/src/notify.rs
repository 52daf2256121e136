//! Transient notices
//!
//! One visible notice at a time with cancellable auto-dismissal. A
//! notice replaced or dismissed by hand never fires its timer later.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

struct Current {
    id: u64,
    message: String,
    timer: CancellationToken,
}

/// Holds the currently visible transient notice, if any.
pub struct NoticeCenter {
    duration: Duration,
    current: Mutex<Option<Current>>,
    next_id: AtomicU64,
    // Handle to self for the auto-dismiss task
    weak: Weak<NoticeCenter>,
}

impl NoticeCenter {
    pub fn new(duration: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            duration,
            current: Mutex::new(None),
            next_id: AtomicU64::new(0),
            weak: weak.clone(),
        })
    }

    /// Show a notice, replacing (and silencing the timer of) any
    /// notice currently visible. Auto-dismisses after the configured
    /// duration unless dismissed manually first.
    pub fn show(&self, message: impl Into<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timer = CancellationToken::new();
        let replaced = self.current.lock().unwrap().replace(Current {
            id,
            message: message.into(),
            timer: timer.clone(),
        });
        if let Some(replaced) = replaced {
            replaced.timer.cancel();
        }

        let center = self.weak.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {
                    if let Some(center) = center.upgrade() {
                        center.dismiss_expired(id);
                    }
                }
                _ = timer.cancelled() => {}
            }
        });
    }

    /// Dismiss the visible notice and cancel its timer.
    pub fn dismiss(&self) {
        if let Some(current) = self.current.lock().unwrap().take() {
            current.timer.cancel();
        }
    }

    /// The currently visible message, if any.
    pub fn current(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|c| c.message.clone())
    }

    // Auto-dismiss path: clears only the notice that started this
    // timer, so a timer racing a replacement cannot clear a newer one.
    fn dismiss_expired(&self, id: u64) {
        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|c| c.id == id) {
            current.take();
        }
    }
}
