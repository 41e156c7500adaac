//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Probe each provider on the blocking pool (no lock held)
//!     → Registry write lock: update counter, swap if needed
//!
//! State machine (state.rs):
//!     Healthy ←→ Unhealthy
//!     One failure demotes, two consecutive successes promote
//! ```
//!
//! # Design Decisions
//! - Pessimistic demotion, hysteresis only on the way back in
//! - Probes are sequential; a hung probe stalls the cycle, not callers
//! - Counters live in the registry so a transition is one critical section

pub mod active;
pub mod simulated;
pub mod state;
