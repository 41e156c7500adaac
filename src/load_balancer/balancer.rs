//! Balancer handle and builder.
//!
//! # Responsibilities
//! - Own the registry behind a reader/writer lock
//! - Serve selections under the read side (admission + resolve)
//! - Apply manual and monitor-driven reclassification under the write side
//! - Start and stop the background health monitor

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::{BalancerConfig, StrategyKind};
use crate::error::{BuildError, SelectError};
use crate::health::active::HealthMonitor;
use crate::health::state::Transition;
use crate::lifecycle::Shutdown;
use crate::load_balancer::admission::{Admission, Reservation};
use crate::load_balancer::provider::{Provider, ProviderId};
use crate::load_balancer::registry::{Registry, RegistrySnapshot};
use crate::load_balancer::Strategy;
use crate::observability::metrics;

/// Shared balancer state, used by callers and by the health monitor.
#[derive(Debug)]
pub struct BalancerCore {
    registry: RwLock<Registry>,
    admission: Arc<Admission>,
    strategy: Box<dyn Strategy>,
}

impl BalancerCore {
    fn new(registry: Registry, per_provider: usize, strategy: Box<dyn Strategy>) -> Self {
        Self {
            registry: RwLock::new(registry),
            admission: Arc::new(Admission::new(per_provider)),
            strategy,
        }
    }

    /// Select a healthy provider and hold an admission slot for it.
    pub fn acquire(&self) -> Result<Lease, SelectError> {
        let result = self.select();
        match &result {
            Ok(_) => metrics::record_request("admitted"),
            Err(e) => {
                tracing::debug!(reason = e.as_label(), error = %e, "Selection rejected");
                metrics::record_request(e.as_label());
            }
        }
        result
    }

    fn select(&self) -> Result<Lease, SelectError> {
        let registry = self.registry.read();
        let healthy = registry.healthy_count();
        let reservation = self.admission.try_reserve(healthy)?;

        let index = self.strategy.next_index(healthy);
        debug_assert!(index < healthy, "strategy returned {} for {}", index, healthy);
        let id = registry.resolve(index).cloned().ok_or(SelectError::Unavailable)?;

        Ok(Lease {
            id,
            _reservation: reservation,
        })
    }

    /// Put a provider back into rotation.
    pub fn add_provider(&self, id: &str) -> bool {
        let (changed, healthy) = {
            let mut registry = self.registry.write();
            (registry.promote(id), registry.healthy_count())
        };
        if changed {
            tracing::info!(provider = %id, healthy, "Provider added to rotation");
            metrics::record_provider_health(id, true);
            metrics::record_healthy_providers(healthy);
        }
        changed
    }

    /// Take a provider out of rotation.
    pub fn remove_provider(&self, id: &str) -> bool {
        let (changed, healthy) = {
            let mut registry = self.registry.write();
            (registry.demote(id), registry.healthy_count())
        };
        if changed {
            tracing::info!(provider = %id, healthy, "Provider removed from rotation");
            metrics::record_provider_health(id, false);
            metrics::record_healthy_providers(healthy);
        }
        changed
    }

    /// Apply a probe outcome under the write lock.
    pub fn record_probe(&self, id: &str, passed: bool) -> Transition {
        let (transition, healthy, counter) = {
            let mut registry = self.registry.write();
            let transition = registry.record_probe(id, passed);
            (transition, registry.healthy_count(), registry.counter(id))
        };

        match transition {
            Transition::Demoted => {
                tracing::warn!(provider = %id, healthy, "Provider failed health check, demoted");
            }
            Transition::Promoted => {
                tracing::info!(provider = %id, healthy, "Provider recovered, promoted");
            }
            Transition::Unchanged => {
                tracing::trace!(provider = %id, passed, counter = ?counter, "Health check recorded");
            }
        }
        if transition != Transition::Unchanged {
            metrics::record_transition(transition.as_label());
            metrics::record_provider_health(id, transition == Transition::Promoted);
            metrics::record_healthy_providers(healthy);
        }
        transition
    }

    pub fn healthy_count(&self) -> usize {
        self.registry.read().healthy_count()
    }

    pub fn in_flight(&self) -> usize {
        self.admission.in_flight()
    }

    /// Providers in construction order.
    pub fn providers(&self) -> Vec<Provider> {
        self.registry.read().providers()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.read().snapshot()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

/// A selected provider plus the admission slot held on its behalf.
///
/// The slot is released when the lease is dropped.
#[derive(Debug)]
pub struct Lease {
    id: ProviderId,
    _reservation: Reservation,
}

impl Lease {
    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// Release the slot and keep the identifier.
    pub fn into_id(self) -> ProviderId {
        self.id
    }
}

struct MonitorTask {
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

/// In-process load balancer.
///
/// Share it between callers behind an `Arc`. Dropping the last handle
/// stops the health monitor.
pub struct Balancer {
    core: Arc<BalancerCore>,
    monitor: Mutex<Option<MonitorTask>>,
}

impl Balancer {
    pub fn builder(providers: Vec<Provider>) -> BalancerBuilder {
        BalancerBuilder::new(providers)
    }

    /// Identifier of a healthy provider.
    ///
    /// The admission slot is released before returning; use
    /// [`Balancer::acquire`] to hold it for the duration of a request.
    pub fn get(&self) -> Result<ProviderId, SelectError> {
        self.core.acquire().map(Lease::into_id)
    }

    /// Select a healthy provider and hold an admission slot until the
    /// returned lease is dropped.
    pub fn acquire(&self) -> Result<Lease, SelectError> {
        self.core.acquire()
    }

    /// Manually put a provider back into rotation. Idempotent.
    pub fn add_provider(&self, id: &str) -> bool {
        self.core.add_provider(id)
    }

    /// Manually take a provider out of rotation. Idempotent.
    pub fn remove_provider(&self, id: &str) -> bool {
        self.core.remove_provider(id)
    }

    pub fn healthy_count(&self) -> usize {
        self.core.healthy_count()
    }

    pub fn in_flight(&self) -> usize {
        self.core.in_flight()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.core.snapshot()
    }

    pub fn core(&self) -> &Arc<BalancerCore> {
        &self.core
    }

    /// Whether a health monitor task is attached and still running.
    pub fn is_monitoring(&self) -> bool {
        self.monitor
            .lock()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Stop the health monitor and wait for it to exit.
    pub async fn shutdown(&self) {
        let task = self.monitor.lock().take();
        if let Some(task) = task {
            task.shutdown.trigger();
            if let Err(e) = task.handle.await {
                tracing::error!(error = %e, "Health monitor task failed");
            }
        }
    }
}

impl std::fmt::Debug for Balancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Balancer")
            .field("core", &self.core)
            .field("monitoring", &self.is_monitoring())
            .finish()
    }
}

/// Builds a [`Balancer`] from providers and configuration.
pub struct BalancerBuilder {
    providers: Vec<Provider>,
    config: BalancerConfig,
    custom_strategy: Option<Box<dyn Strategy>>,
}

impl BalancerBuilder {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self {
            providers,
            config: BalancerConfig::default(),
            custom_strategy: None,
        }
    }

    pub fn config(mut self, config: BalancerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.config.strategy = kind;
        self.custom_strategy = None;
        self
    }

    /// Use a strategy not covered by [`StrategyKind`].
    pub fn custom_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.custom_strategy = Some(Box::new(strategy));
        self
    }

    pub fn heartbeat_interval_secs(mut self, secs: u64) -> Self {
        self.config.heartbeat_interval_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<Balancer, BuildError> {
        let config = self.config;
        let registry = Registry::new(self.providers, config.max_providers)?;
        let providers = registry.len();

        let runtime = match config.heartbeat_interval_secs {
            Some(_) => Some(tokio::runtime::Handle::try_current().map_err(|_| BuildError::NoRuntime)?),
            None => None,
        };

        let strategy = self
            .custom_strategy
            .unwrap_or_else(|| config.strategy.build());
        let core = Arc::new(BalancerCore::new(
            registry,
            config.max_concurrent_requests_per_provider,
            strategy,
        ));
        metrics::record_healthy_providers(providers);

        let monitor = match (runtime, config.heartbeat_interval_secs) {
            (Some(runtime), Some(secs)) => {
                let shutdown = Shutdown::new();
                let monitor = HealthMonitor::new(core.clone(), Duration::from_secs(secs));
                let handle = runtime.spawn(monitor.run(shutdown.subscribe()));
                Some(MonitorTask { shutdown, handle })
            }
            _ => None,
        };

        tracing::info!(
            providers,
            strategy = core.strategy_name(),
            max_concurrent_requests_per_provider = config.max_concurrent_requests_per_provider,
            heartbeat_interval_secs = ?config.heartbeat_interval_secs,
            "Balancer built"
        );

        Ok(Balancer {
            core,
            monitor: Mutex::new(monitor),
        })
    }
}
