//! Progress reporting and cancellation for long runs

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Points processed so far out of the run's total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed fraction in [0, 1]; an empty run counts as complete
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Callback invoked after each completed chunk or batch
pub type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

/// Cooperative cancellation flag, checked between chunks and batches
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Monotonic counter feeding an optional callback
pub struct ProgressTracker<'a> {
    total: usize,
    processed: AtomicUsize,
    callback: Option<&'a ProgressCallback>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(total: usize, callback: Option<&'a ProgressCallback>) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            callback,
        }
    }

    /// Record `count` more processed points and notify
    pub fn advance(&self, count: usize) -> Progress {
        let processed = (self.processed.fetch_add(count, Ordering::SeqCst) + count).min(self.total);
        let progress = Progress {
            processed,
            total: self.total,
        };
        if let Some(callback) = self.callback {
            callback(progress);
        }
        progress
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst).min(self.total)
    }
}
