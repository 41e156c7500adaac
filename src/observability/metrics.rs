//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): selections by outcome
//!   (admitted, overloaded, unavailable)
//! - `balancer_healthy_providers` (gauge): size of the healthy prefix
//! - `balancer_provider_health` (gauge): 1=healthy, 0=unhealthy, per provider
//! - `balancer_health_transitions_total` (counter): promotions/demotions

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str) {
    metrics::counter!("balancer_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_healthy_providers(count: usize) {
    metrics::gauge!("balancer_healthy_providers").set(count as f64);
}

pub fn record_provider_health(provider: &str, healthy: bool) {
    metrics::gauge!("balancer_provider_health", "provider" => provider.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_transition(transition: &'static str) {
    metrics::counter!("balancer_health_transitions_total", "transition" => transition).increment(1);
}
