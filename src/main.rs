//! Provider balancer demo runner.
//!
//! Builds a simulated fleet `Provider-1..N` whose health probes fail at
//! random, starts the balancer with a heartbeat, and hammers `get()`
//! from concurrent workers while the monitor reshuffles the partition.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::task::JoinSet;

use provider_balancer::config::loader::load_config;
use provider_balancer::config::{AppConfig, StrategyKind};
use provider_balancer::health::simulated::RandomFailure;
use provider_balancer::lifecycle::signals::wait_for_signal;
use provider_balancer::observability::{logging, metrics};
use provider_balancer::{Balancer, Provider};

#[derive(Parser)]
#[command(name = "provider-balancer")]
#[command(about = "Run the provider balancer against a simulated fleet", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total number of requests to issue.
    #[arg(short, long)]
    requests: Option<u64>,

    /// Number of concurrent workers.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Selection strategy.
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyKind>,
}

#[derive(Default)]
struct Tally {
    hits: BTreeMap<String, u64>,
    overloaded: u64,
    unavailable: u64,
}

impl Tally {
    fn merge(&mut self, other: Tally) {
        for (id, n) in other.hits {
            *self.hits.entry(id).or_default() += n;
        }
        self.overloaded += other.overloaded;
        self.unavailable += other.unavailable;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(requests) = cli.requests {
        config.simulation.requests = requests;
    }
    if let Some(workers) = cli.workers {
        config.simulation.workers = workers.max(1);
    }
    if let Some(strategy) = cli.strategy {
        config.balancer.strategy = strategy;
    }
    if config.balancer.heartbeat_interval_secs.is_none() {
        config.balancer.heartbeat_interval_secs = Some(1);
    }

    logging::init(&config.observability.log_level);
    tracing::info!("provider-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let probe = RandomFailure::new(config.simulation.failure_probability);
    let providers = (1..=config.simulation.providers)
        .map(|i| Provider::new(format!("Provider-{}", i), probe))
        .collect();
    let balancer = Arc::new(
        Balancer::builder(providers)
            .config(config.balancer.clone())
            .build()?,
    );

    let started = Instant::now();
    let workers = config.simulation.workers;
    let requests = config.simulation.requests;
    let mut tasks = JoinSet::new();
    for worker in 0..workers {
        let balancer = balancer.clone();
        let share = requests / workers as u64 + u64::from((worker as u64) < requests % workers as u64);
        tasks.spawn(async move {
            let mut tally = Tally::default();
            for i in 0..share {
                match balancer.get() {
                    Ok(id) => *tally.hits.entry(id.to_string()).or_default() += 1,
                    Err(e) if e.is_overloaded() => tally.overloaded += 1,
                    Err(_) => tally.unavailable += 1,
                }
                if i % 1024 == 0 {
                    tokio::task::yield_now().await;
                }
            }
            tally
        });
    }

    let mut total = Tally::default();
    let interrupted = tokio::select! {
        _ = async {
            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(tally) => total.merge(tally),
                    Err(e) => tracing::error!(error = %e, "Worker failed"),
                }
            }
        } => false,
        _ = wait_for_signal() => true,
    };
    if interrupted {
        tracing::warn!("Interrupted, stopping workers");
        tasks.shutdown().await;
    }

    balancer.shutdown().await;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        overloaded = total.overloaded,
        unavailable = total.unavailable,
        "Run complete"
    );
    for (id, hits) in &total.hits {
        println!("{:<16} {}", id, hits);
    }
    println!("{}", serde_json::to_string_pretty(&balancer.snapshot())?);

    Ok(())
}
