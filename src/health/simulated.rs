//! Simulated health probes for demos and soak runs.

use rand::Rng;

use crate::load_balancer::provider::HealthProbe;

/// Probe that fails with a fixed probability on every check.
#[derive(Debug, Clone, Copy)]
pub struct RandomFailure {
    failure_probability: f64,
}

impl RandomFailure {
    /// `failure_probability` is clamped to `[0, 1]`.
    pub fn new(failure_probability: f64) -> Self {
        Self {
            failure_probability: failure_probability.clamp(0.0, 1.0),
        }
    }

    pub fn failure_probability(&self) -> f64 {
        self.failure_probability
    }
}

impl HealthProbe for RandomFailure {
    fn check(&self) -> bool {
        !rand::thread_rng().gen_bool(self.failure_probability)
    }
}
