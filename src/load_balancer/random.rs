//! Uniform random selection strategy.

use rand::Rng;

use crate::load_balancer::Strategy;

/// Random selector.
/// Draws a fresh index from the thread-local generator on every call.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Random {
    fn next_index(&self, healthy: usize) -> usize {
        debug_assert!(healthy > 0);
        rand::thread_rng().gen_range(0..healthy)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
