//! The shared progress and notification bus.
//!
//! One extraction worker writes to the bus while an observer reads from it,
//! either by polling [`ProgressBus::snapshot`] or by receiving pushed
//! [`InstallObserver`] callbacks. The state is a single mutex-guarded slot;
//! there is exactly one writer so no lock ordering concerns arise.

use crate::notify;
use crate::types::{Notification, Outcome, ProgressState};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Narrow interface the extraction adapters write progress through.
pub trait ProgressSink: Send + Sync {
    /// Report a percentage (clamped to 0..=100) together with a message.
    fn report(&self, percent: u32, message: &str);

    /// Forward a message without changing the current percentage.
    fn message(&self, message: &str);
}

/// Callbacks a presentation layer registers before running an install.
///
/// `on_progress` may be called from the extraction worker thread. The
/// terminal pair `on_outcome` then `on_notification` fires at most once per
/// job, strictly after the worker has finished.
pub trait InstallObserver: Send + Sync {
    fn on_progress(&self, percent: u8, message: &str);

    fn on_outcome(&self, _outcome: &Outcome) {}

    fn on_notification(&self, _notice: &Notification) {}
}

/// Thread-safe single-slot progress state plus terminal-outcome delivery.
#[derive(Default)]
pub struct ProgressBus {
    state: Mutex<ProgressState>,
    observer: Mutex<Option<Arc<dyn InstallObserver>>>,
    finished: AtomicBool,
}

impl ProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the observer that receives pushed updates.
    pub fn subscribe(&self, observer: Arc<dyn InstallObserver>) {
        *self.observer.lock() = Some(observer);
    }

    /// Latest progress value, for polling observers.
    pub fn snapshot(&self) -> ProgressState {
        self.state.lock().clone()
    }

    /// Arm the bus for a new job: clear stale progress and re-enable
    /// terminal delivery. Each job gets its own exactly-once guarantee.
    pub fn begin_job(&self) {
        *self.state.lock() = ProgressState::default();
        self.finished.store(false, Ordering::SeqCst);
    }

    /// Deliver the terminal outcome and its notification, at most once per
    /// job (see [`begin_job`](Self::begin_job)).
    ///
    /// Returns the notification so the caller can hand it to collaborators
    /// that are not registered as observers. Repeated calls within one job
    /// are ignored.
    pub fn finish(&self, outcome: &Outcome) -> Option<Notification> {
        if self.finished.swap(true, Ordering::SeqCst) {
            tracing::warn!("terminal outcome reported twice, ignoring");
            return None;
        }

        let notice = notify::completion_notice(outcome);
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer.on_outcome(outcome);
            observer.on_notification(&notice);
        }
        Some(notice)
    }
}

impl ProgressSink for ProgressBus {
    fn report(&self, percent: u32, message: &str) {
        let percent = percent.min(100) as u8;
        {
            let mut state = self.state.lock();
            state.percent = percent;
            state.message = message.to_owned();
        }
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer.on_progress(percent, message);
        }
    }

    fn message(&self, message: &str) {
        let percent = {
            let mut state = self.state.lock();
            state.message = message.to_owned();
            state.percent
        };
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer.on_progress(percent, message);
        }
    }
}
