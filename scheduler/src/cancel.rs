use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A one-shot, clonable cancellation signal, checked cooperatively by the
/// Scheduler rather than delivered as a preemptive interrupt.
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    grace_period: Duration,
}

impl CancelHandle {
    pub fn new() -> Self {
        CancelHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
            grace_period: Duration::from_secs(10),
        }
    }

    pub fn with_grace_period(grace_period: Duration) -> Self {
        CancelHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
            grace_period,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        CancelHandle::new()
    }
}
