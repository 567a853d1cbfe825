//! Monotonic progress counter.

use std::sync::atomic::{AtomicUsize, Ordering};

/// An atomically incremented counter that only ever grows.
///
/// Inside the pipeline it is bumped while the buffer mutex is held, so the
/// value is consistent with buffer occupancy for anyone holding that lock.
/// [`get`](Self::get) can also be called without the lock for progress
/// reporting.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicUsize,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one and returns the value before the increment.
    pub fn increment(&self) -> usize {
        self.value.fetch_add(1, Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.value.load(Ordering::SeqCst)
    }
}
