//! Round-robin selection strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::Strategy;

/// Round-robin selector.
/// Stores a shared counter to rotate through the healthy prefix.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the rotation at an arbitrary counter value.
    pub fn starting_at(counter: usize) -> Self {
        Self {
            counter: AtomicUsize::new(counter),
        }
    }
}

impl Strategy for RoundRobin {
    fn next_index(&self, healthy: usize) -> usize {
        debug_assert!(healthy > 0);
        // Unsigned fetch_add wraps to zero on overflow, so the modulo
        // is always taken over a non-negative counter.
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        count % healthy
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
