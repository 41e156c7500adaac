//! Provider abstraction.
//!
//! # Responsibilities
//! - Represent a single backend provider by a stable identifier
//! - Carry the provider's health probe (one synchronous boolean check)
//!
//! Health *classification* is not stored here; it is a property of the
//! provider's position in the registry.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

/// Stable, cheaply cloned provider identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProviderId(Arc<str>);

impl ProviderId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for ProviderId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for ProviderId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ProviderId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A provider's health check capability.
///
/// Called from the monitor's blocking pool, never while the registry is
/// locked. A panic inside `check` is treated as a failed probe.
pub trait HealthProbe: Send + Sync {
    fn check(&self) -> bool;
}

impl<F> HealthProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn check(&self) -> bool {
        self()
    }
}

/// Probe that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHealthy;

impl HealthProbe for AlwaysHealthy {
    fn check(&self) -> bool {
        true
    }
}

/// Probe that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysUnhealthy;

impl HealthProbe for AlwaysUnhealthy {
    fn check(&self) -> bool {
        false
    }
}

/// A single backend provider.
#[derive(Clone)]
pub struct Provider {
    id: ProviderId,
    probe: Arc<dyn HealthProbe>,
}

impl Provider {
    /// Create a provider with the given health probe.
    pub fn new(id: impl Into<ProviderId>, probe: impl HealthProbe + 'static) -> Self {
        Self {
            id: id.into(),
            probe: Arc::new(probe),
        }
    }

    /// Create a provider whose probe always passes.
    pub fn healthy(id: impl Into<ProviderId>) -> Self {
        Self::new(id, AlwaysHealthy)
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// Run the health probe on the calling thread.
    pub fn check(&self) -> bool {
        self.probe.check()
    }

    pub(crate) fn probe(&self) -> Arc<dyn HealthProbe> {
        self.probe.clone()
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_closure_probe() {
        let flag = Arc::new(AtomicBool::new(true));
        let f = flag.clone();
        let provider = Provider::new("p1", move || f.load(Ordering::SeqCst));

        assert!(provider.check());
        flag.store(false, Ordering::SeqCst);
        assert!(!provider.check());
    }

    #[test]
    fn test_provider_id_comparisons() {
        let id = ProviderId::from("Provider-1");
        assert_eq!(id, "Provider-1");
        assert_eq!(id.to_string(), "Provider-1");
        assert!(id.ends_with("-1"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Provider-1\"");
    }

    #[test]
    fn test_constant_probes() {
        assert!(Provider::healthy("a").check());
        assert!(!Provider::new("b", AlwaysUnhealthy).check());
    }
}
