//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, probabilities in [0, 1])
//! - Check the simulated fleet fits the provider maximum
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("balancer.max_providers must be at least 1")]
    ZeroMaxProviders,

    #[error("balancer.max_concurrent_requests_per_provider must be at least 1")]
    ZeroRequestLimit,

    #[error("balancer.heartbeat_interval_secs must be at least 1 when set")]
    ZeroHeartbeat,

    #[error("simulation.failure_probability must be within [0, 1], got {0}")]
    FailureProbabilityOutOfRange(f64),

    #[error("simulation.providers ({providers}) exceeds balancer.max_providers ({max})")]
    TooManySimulatedProviders { providers: usize, max: usize },

    #[error("simulation.workers must be at least 1")]
    ZeroWorkers,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let balancer = &config.balancer;
    let simulation = &config.simulation;

    if balancer.max_providers == 0 {
        errors.push(ValidationError::ZeroMaxProviders);
    }
    if balancer.max_concurrent_requests_per_provider == 0 {
        errors.push(ValidationError::ZeroRequestLimit);
    }
    if balancer.heartbeat_interval_secs == Some(0) {
        errors.push(ValidationError::ZeroHeartbeat);
    }
    if !(0.0..=1.0).contains(&simulation.failure_probability) {
        errors.push(ValidationError::FailureProbabilityOutOfRange(
            simulation.failure_probability,
        ));
    }
    if simulation.providers > balancer.max_providers {
        errors.push(ValidationError::TooManySimulatedProviders {
            providers: simulation.providers,
            max: balancer.max_providers,
        });
    }
    if simulation.workers == 0 {
        errors.push(ValidationError::ZeroWorkers);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
