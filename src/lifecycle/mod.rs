//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() or sender dropped → monitor loop exits
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → demo run stops issuing requests → balancer shutdown
//! ```
//!
//! # Design Decisions
//! - Background tasks never outlive an explicit stop signal
//! - Dropping the coordinator counts as a stop signal

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
