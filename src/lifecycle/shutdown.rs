//! Stop signal for the balancer's health monitor.
//!
//! The balancer owns one `Shutdown` per monitor task. The monitor treats
//! both outcomes of `recv()` as "stop": `Ok(())` after `trigger()`, and
//! `Err(Closed)` once the coordinator is dropped together with the
//! balancer. That second path is what lets a dropped balancer stop its
//! monitor without an explicit call.

use tokio::sync::broadcast;

/// Broadcast coordinator with a single-slot channel; one `()` is enough
/// because receivers only ever wait for the first message.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before spawning the task, so a trigger sent before the
    /// task first polls is still observed.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber to stop.
    pub fn trigger(&self) {
        // No subscribers left means the monitor already exited.
        let _ = self.tx.send(());
    }

    /// Number of monitor receivers still alive.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
