//! In-process provider load balancer.
//!
//! Hands callers the identifier of one healthy provider per request,
//! keeps unhealthy providers out of rotation, and probes every provider
//! in the background.

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::{BalancerConfig, StrategyKind};
pub use error::{BuildError, SelectError};
pub use load_balancer::provider::{HealthProbe, Provider, ProviderId};
pub use load_balancer::{Balancer, BalancerBuilder, Lease};
