use core::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop request shared between the trial runner and whatever
/// raises the interrupt (the console task on the firmware).
///
/// Only plain loads and stores are used so this works on cores without
/// compare-and-swap.
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
