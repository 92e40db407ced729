//! Count-based sliding window of call outcomes.

use std::collections::VecDeque;

/// Fixed-size record of the most recent outcomes (`true` = failure).
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
    failures: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
            failures: 0,
        }
    }

    /// Record one outcome, evicting the oldest when full.
    pub fn record(&mut self, failed: bool) {
        if self.outcomes.len() == self.capacity {
            if let Some(true) = self.outcomes.pop_front() {
                self.failures -= 1;
            }
        }
        self.outcomes.push_back(failed);
        if failed {
            self.failures += 1;
        }
    }

    /// Number of outcomes currently retained.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Failure percentage in `[0, 100]`; 0 when empty.
    pub fn failure_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.failures as f64 * 100.0 / self.outcomes.len() as f64
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.failures = 0;
    }
}
