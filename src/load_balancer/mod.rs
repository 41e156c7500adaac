//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Caller → balancer.rs (take registry read lock)
//!     → admission.rs (reserve against healthy capacity)
//!     → Apply selection strategy over [0, healthy):
//!         - round_robin.rs (shared rotating counter)
//!         - random.rs (uniform draw)
//!     → registry.rs (resolve position to provider id)
//!     → Return lease or SelectError
//!
//! Health monitor / operator → balancer.rs (take write lock)
//!     → registry.rs (swap across the partition boundary)
//! ```
//!
//! # Design Decisions
//! - Strategies only produce an index; the registry owns membership
//! - Unhealthy providers sit outside the selectable prefix
//! - Write lock covers one swap plus one counter update, nothing more

pub mod admission;
pub mod balancer;
pub mod provider;
pub mod random;
pub mod registry;
pub mod round_robin;

use crate::config::StrategyKind;

pub use balancer::{Balancer, BalancerBuilder, BalancerCore, Lease};

/// Selection policy over the healthy prefix.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Pick a position in `[0, healthy)`. `healthy` is at least 1.
    fn next_index(&self, healthy: usize) -> usize;

    fn name(&self) -> &'static str;
}

impl StrategyKind {
    /// Instantiate the configured strategy.
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(random::Random::new()),
            StrategyKind::RoundRobin => Box::new(round_robin::RoundRobin::new()),
        }
    }
}
