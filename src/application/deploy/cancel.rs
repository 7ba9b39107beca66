//! Cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What an interrupt (Ctrl+C) should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// First request: stop at the next check and tear down
    Cancel,
    /// Repeated request: the pipeline is stuck inside an operation
    ForceExit,
}

/// Shared flag checked by the pipeline between stages and transfers
///
/// Clones observe the same flag; the binary hands one to its Ctrl+C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Record an interrupt; the second one escalates to `ForceExit`
    pub fn interrupt(&self) -> Interrupt {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            Interrupt::ForceExit
        } else {
            Interrupt::Cancel
        }
    }
}
