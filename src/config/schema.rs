//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the demo binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Balancer construction settings.
    pub balancer: BalancerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Simulated provider fleet and request load.
    pub simulation: SimulationConfig,
}

/// Selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    #[default]
    RoundRobin,
}

/// Balancer configuration. Read-only once the balancer is built.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Maximum number of providers accepted at construction.
    pub max_providers: usize,

    /// Concurrent requests admitted per healthy provider.
    pub max_concurrent_requests_per_provider: usize,

    /// Seconds between health check cycles. No monitor when unset.
    pub heartbeat_interval_secs: Option<u64>,

    /// Selection strategy.
    pub strategy: StrategyKind,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            max_providers: 10,
            max_concurrent_requests_per_provider: 1000,
            heartbeat_interval_secs: None,
            strategy: StrategyKind::RoundRobin,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Simulated fleet used by the demo binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of providers, named `Provider-1..N`.
    pub providers: usize,

    /// Probability that any single health probe fails.
    pub failure_probability: f64,

    /// Total number of `get()` calls to issue.
    pub requests: u64,

    /// Concurrent worker tasks issuing requests.
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            providers: 7,
            failure_probability: 0.3,
            requests: 100_000,
            workers: 8,
        }
    }
}
