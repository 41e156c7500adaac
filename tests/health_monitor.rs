//! Background monitor driving the partition.

use std::sync::atomic::Ordering;
use std::time::Duration;

use provider_balancer::health::active::HealthMonitor;
use provider_balancer::{Balancer, Provider};

mod common;

async fn wait_for<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cond()
}

#[tokio::test(start_paused = true)]
async fn test_monitor_demotes_failing_provider() {
    let (flaky, _) = common::switchable("flaky", false);
    let balancer = Balancer::builder(vec![Provider::healthy("steady"), flaky])
        .heartbeat_interval_secs(1)
        .build()
        .unwrap();
    assert!(balancer.is_monitoring());

    // The first cycle runs immediately.
    assert!(wait_for(|| balancer.healthy_count() == 1).await);
    for _ in 0..20 {
        assert_eq!(balancer.get().unwrap(), "steady");
    }

    balancer.shutdown().await;
    assert!(!balancer.is_monitoring());
}

#[tokio::test]
async fn test_recovery_needs_two_consecutive_successes() {
    let (provider, healthy) = common::switchable("p", false);
    let balancer = Balancer::builder(vec![provider]).build().unwrap();
    let monitor = HealthMonitor::new(balancer.core().clone(), Duration::from_secs(1));

    monitor.check_all().await;
    assert_eq!(balancer.healthy_count(), 0);

    // Alternating outcomes never reach the threshold.
    for i in 0..10 {
        healthy.store(i % 2 == 0, Ordering::SeqCst);
        monitor.check_all().await;
        assert_eq!(balancer.healthy_count(), 0);
    }

    healthy.store(true, Ordering::SeqCst);
    monitor.check_all().await;
    monitor.check_all().await;
    assert_eq!(balancer.healthy_count(), 1);
    assert_eq!(balancer.snapshot().providers[0].counter, 0);
}

#[tokio::test]
async fn test_manual_override_and_monitor_agree() {
    let (provider, healthy) = common::switchable("p", true);
    let balancer = Balancer::builder(vec![provider, Provider::healthy("q")])
        .build()
        .unwrap();
    let monitor = HealthMonitor::new(balancer.core().clone(), Duration::from_secs(1));

    assert!(balancer.remove_provider("p"));
    // Healthy probes bring it back after two cycles.
    monitor.check_all().await;
    assert_eq!(balancer.healthy_count(), 1);
    monitor.check_all().await;
    assert_eq!(balancer.healthy_count(), 2);

    healthy.store(false, Ordering::SeqCst);
    monitor.check_all().await;
    assert_eq!(balancer.healthy_count(), 1);
    assert!(balancer.add_provider("p"));
    assert_eq!(balancer.healthy_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stalled_check_does_not_block_get() {
    let (stalled, gate) = common::gated("stalled");
    let balancer = Balancer::builder(vec![stalled, Provider::healthy("fast")])
        .heartbeat_interval_secs(1)
        .build()
        .unwrap();

    assert!(wait_for(|| gate.entered()).await);
    let result = tokio::time::timeout(Duration::from_millis(500), async {
        for _ in 0..100 {
            balancer.get().unwrap();
        }
    })
    .await;
    assert!(result.is_ok());
    assert_eq!(balancer.healthy_count(), 2);

    balancer.shutdown().await;
    drop(gate);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_interrupts_stalled_cycle() {
    let (stalled, gate) = common::gated("stalled");
    let balancer = Balancer::builder(vec![stalled])
        .heartbeat_interval_secs(1)
        .build()
        .unwrap();

    // The monitor is now parked inside the first cycle.
    assert!(wait_for(|| gate.entered()).await);

    let stopped = tokio::time::timeout(Duration::from_secs(2), balancer.shutdown()).await;
    assert!(stopped.is_ok(), "shutdown waited on a stalled health check");
    assert!(!balancer.is_monitoring());

    drop(gate);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_monitor() {
    let balancer = Balancer::builder(common::providers(2))
        .heartbeat_interval_secs(1)
        .build()
        .unwrap();
    let core = balancer.core().clone();
    drop(balancer);

    // Only the test's handle remains once the monitor task exits.
    assert!(
        wait_for(|| std::sync::Arc::strong_count(&core) == 1).await,
        "monitor still holds the core"
    );
}
