//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Balancer, monitor, demo runner produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed
//! - Provider id is the only per-provider label

pub mod logging;
pub mod metrics;
