//! Partitioned provider registry.
//!
//! # Responsibilities
//! - Keep every provider in one ordered sequence
//! - Keep healthy providers in the contiguous prefix `[0, healthy)`
//! - Map provider id to its current position
//! - Track the hysteresis counter of every provider
//!
//! # Design Decisions
//! - Promote/demote are a single swap with the partition boundary, O(1)
//! - The sequence never grows or shrinks after construction
//! - The registry itself is not synchronised; the balancer wraps it in
//!   a reader/writer lock so selection only needs the read side

use std::collections::HashMap;

use serde::Serialize;

use crate::error::BuildError;
use crate::health::state::{self, Transition, Verdict};
use crate::load_balancer::provider::{Provider, ProviderId};

#[derive(Debug)]
struct Slot {
    provider: Provider,
    counter: u8,
}

/// Healthy/unhealthy partition over a fixed provider set.
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Slot>,
    positions: HashMap<ProviderId, usize>,
    /// Construction order, used for probing.
    order: Vec<ProviderId>,
    healthy: usize,
}

impl Registry {
    /// Build a registry with every provider initially healthy.
    pub fn new(providers: Vec<Provider>, max_providers: usize) -> Result<Self, BuildError> {
        if providers.len() > max_providers {
            return Err(BuildError::TooManyProviders {
                count: providers.len(),
                max: max_providers,
            });
        }

        let mut positions = HashMap::with_capacity(providers.len());
        let mut order = Vec::with_capacity(providers.len());
        for (i, provider) in providers.iter().enumerate() {
            if positions.insert(provider.id().clone(), i).is_some() {
                return Err(BuildError::DuplicateProvider(provider.id().clone()));
            }
            order.push(provider.id().clone());
        }

        let healthy = providers.len();
        let slots = providers
            .into_iter()
            .map(|provider| Slot {
                provider,
                counter: 0,
            })
            .collect();

        Ok(Self {
            slots,
            positions,
            order,
            healthy,
        })
    }

    /// Current partition boundary.
    pub fn healthy_count(&self) -> usize {
        self.healthy
    }

    /// Total number of providers, healthy or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Identifier stored at `position`, if that position is healthy.
    pub fn resolve(&self, position: usize) -> Option<&ProviderId> {
        if position < self.healthy {
            self.slots.get(position).map(|slot| slot.provider.id())
        } else {
            None
        }
    }

    /// Current position of a provider.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn is_healthy(&self, id: &str) -> Option<bool> {
        self.position(id).map(|p| p < self.healthy)
    }

    /// Hysteresis counter of a provider.
    pub fn counter(&self, id: &str) -> Option<u8> {
        self.position(id).map(|p| self.slots[p].counter)
    }

    /// Providers in construction order.
    pub fn providers(&self) -> Vec<Provider> {
        self.order
            .iter()
            .filter_map(|id| self.position(id))
            .map(|p| self.slots[p].provider.clone())
            .collect()
    }

    /// Move a provider out of the healthy prefix.
    ///
    /// Returns `false` if it was already unhealthy or is unknown.
    pub fn demote(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(p) if p < self.healthy => {
                let last = self.healthy - 1;
                self.swap(p, last);
                self.healthy = last;
                true
            }
            _ => false,
        }
    }

    /// Move a provider into the healthy prefix.
    ///
    /// Returns `false` if it was already healthy or is unknown.
    pub fn promote(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(p) if p >= self.healthy => {
                let boundary = self.healthy;
                self.swap(p, boundary);
                self.healthy = boundary + 1;
                true
            }
            _ => false,
        }
    }

    /// Apply one probe outcome: update the counter and re-partition.
    pub fn record_probe(&mut self, id: &str, passed: bool) -> Transition {
        let Some(p) = self.position(id) else {
            return Transition::Unchanged;
        };

        let (counter, verdict) = state::step(self.slots[p].counter, passed);
        self.slots[p].counter = counter;

        match verdict {
            Verdict::Demote if self.demote(id) => Transition::Demoted,
            Verdict::Promote if self.promote(id) => Transition::Promoted,
            _ => Transition::Unchanged,
        }
    }

    /// Serialisable view of the whole registry.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let providers = self
            .slots
            .iter()
            .enumerate()
            .map(|(position, slot)| ProviderStatus {
                id: slot.provider.id().clone(),
                position,
                healthy: position < self.healthy,
                counter: slot.counter,
            })
            .collect();

        RegistrySnapshot {
            healthy_count: self.healthy,
            providers,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.slots.swap(i, j);
        self.positions.insert(self.slots[i].provider.id().clone(), i);
        self.positions.insert(self.slots[j].provider.id().clone(), j);
        debug_assert_eq!(self.positions.len(), self.slots.len());
    }
}

/// Status of one provider inside a [`RegistrySnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub id: ProviderId,
    pub position: usize,
    pub healthy: bool,
    pub counter: u8,
}

/// Point-in-time copy of the registry, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub healthy_count: usize,
    pub providers: Vec<ProviderStatus>,
}

impl RegistrySnapshot {
    /// Identifiers of the healthy prefix, in position order.
    pub fn healthy_ids(&self) -> Vec<ProviderId> {
        self.providers
            .iter()
            .filter(|p| p.healthy)
            .map(|p| p.id.clone())
            .collect()
    }
}
