//! Admission bound under concurrent callers.

use std::sync::{Arc, Barrier};
use std::thread;

use provider_balancer::{Balancer, BalancerConfig, SelectError};

mod common;

fn balancer(providers: usize, per_provider: usize) -> Balancer {
    let config = BalancerConfig {
        max_concurrent_requests_per_provider: per_provider,
        ..Default::default()
    };
    Balancer::builder(common::providers(providers))
        .config(config)
        .build()
        .unwrap()
}

#[test]
fn test_h_times_k_plus_one_is_rejected() {
    let balancer = balancer(3, 4);

    let leases: Vec<_> = (0..12).map(|_| balancer.acquire().unwrap()).collect();
    assert_eq!(
        balancer.acquire().unwrap_err(),
        SelectError::Overloaded {
            in_flight: 13,
            capacity: 12
        }
    );

    drop(leases);
    assert_eq!(balancer.in_flight(), 0);
}

#[test]
fn test_capacity_shrinks_with_partition() {
    let balancer = balancer(3, 4);
    let _held: Vec<_> = (0..8).map(|_| balancer.acquire().unwrap()).collect();

    balancer.remove_provider("Provider-1");
    assert!(balancer.acquire().unwrap_err().is_overloaded());

    balancer.add_provider("Provider-1");
    assert!(balancer.acquire().is_ok());
}

#[test]
fn test_concurrent_acquires_respect_bound() {
    let balancer = Arc::new(balancer(2, 3));
    let threads = 24;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let balancer = balancer.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let lease = balancer.acquire();
                let admitted = lease.is_ok();
                barrier.wait();
                drop(lease);
                admitted
            })
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert!(admitted >= 1 && admitted <= 6, "admitted {}", admitted);
    assert_eq!(balancer.in_flight(), 0);
}

#[test]
fn test_concurrent_gets_with_churn_never_return_removed() {
    let balancer = Arc::new(balancer(7, 1000));
    balancer.remove_provider("Provider-3");

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let balancer = balancer.clone();
            thread::spawn(move || {
                for _ in 0..20_000 {
                    match balancer.get() {
                        Ok(id) => assert_ne!(id, "Provider-3"),
                        Err(e) => panic!("unexpected {}", e),
                    }
                }
            })
        })
        .collect();

    let churn = {
        let balancer = balancer.clone();
        thread::spawn(move || {
            for i in 0..5_000 {
                let id = format!("Provider-{}", i % 2 + 1);
                balancer.remove_provider(&id);
                balancer.add_provider(&id);
            }
        })
    };

    for r in readers {
        r.join().unwrap();
    }
    churn.join().unwrap();
    assert_eq!(balancer.healthy_count(), 6);
    assert_eq!(balancer.in_flight(), 0);
}
