//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every provider, one at a time
//! - Feed each result through the registry's hysteresis rule

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task;
use tokio::time::{self, MissedTickBehavior};

use crate::health::state::Transition;
use crate::load_balancer::provider::Provider;
use crate::load_balancer::BalancerCore;

pub struct HealthMonitor {
    core: Arc<BalancerCore>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(core: Arc<BalancerCore>, interval: Duration) -> Self {
        Self { core, interval }
    }

    /// Probe on every tick until the shutdown channel fires or closes.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            providers = self.core.providers().len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A hung probe stalls this cycle only; the stop signal
                    // still ends the loop.
                    tokio::select! {
                        _ = self.check_all() => {}
                        _ = shutdown.recv() => {
                            tracing::info!("Health monitor received shutdown signal mid-cycle, exiting loop");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one probing cycle over all providers in construction order.
    pub async fn check_all(&self) -> Vec<(Provider, Transition)> {
        let providers = self.core.providers();
        let mut outcomes = Vec::with_capacity(providers.len());

        for provider in providers {
            let passed = probe(&provider).await;
            let transition = self.core.record_probe(provider.id(), passed);
            outcomes.push((provider, transition));
        }

        outcomes
    }
}

/// Run a provider's probe on the blocking pool. A panicking probe
/// counts as a failure.
async fn probe(provider: &Provider) -> bool {
    let check = provider.probe();
    match task::spawn_blocking(move || check.check()).await {
        Ok(passed) => passed,
        Err(e) => {
            tracing::error!(provider = %provider.id(), error = %e, "Health probe panicked");
            false
        }
    }
}
