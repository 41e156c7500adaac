//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use provider_balancer::Provider;

/// `Provider-1..=n`, all with always-passing probes.
pub fn providers(n: usize) -> Vec<Provider> {
    (1..=n)
        .map(|i| Provider::healthy(format!("Provider-{}", i)))
        .collect()
}

/// A provider whose probe result can be flipped from the test.
#[allow(dead_code)]
pub fn switchable(id: &str, healthy: bool) -> (Provider, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(healthy));
    let f = flag.clone();
    (Provider::new(id, move || f.load(Ordering::SeqCst)), flag)
}

/// Holds a provider's health check blocked until dropped.
#[allow(dead_code)]
pub struct Gate {
    entered: Arc<AtomicBool>,
    _release: std::sync::mpsc::Sender<()>,
}

#[allow(dead_code)]
impl Gate {
    /// Whether the health check has started and is now blocked.
    pub fn entered(&self) -> bool {
        self.entered.load(Ordering::SeqCst)
    }
}

/// A provider whose health check blocks until the returned gate drops.
#[allow(dead_code)]
pub fn gated(id: &str) -> (Provider, Gate) {
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let rx = std::sync::Mutex::new(rx);
    let entered = Arc::new(AtomicBool::new(false));
    let e = entered.clone();
    let provider = Provider::new(id, move || {
        e.store(true, Ordering::SeqCst);
        // Returns once the sender is dropped.
        let _ = rx.lock().map(|rx| rx.recv());
        true
    });
    (
        provider,
        Gate {
            entered,
            _release: tx,
        },
    )
}
