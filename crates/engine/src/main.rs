//! Process bring-up: parses CLI args, loads configuration, wires the cache,
//! pending queue, opportunity detector, bundle builder, and submitter
//! together, and serves the metrics endpoint.

mod config;
mod ingest;
mod metrics;
mod pipeline;

use arb_cache::{CountingRollbackObserver, IngestCache};
use arb_decode::dispatch::Dispatcher;
use arb_pending::{PendingQueue, PendingQueueConfig};
use arb_submitter::{Submitter, SubmitterConfig, TestTransport};
use clap::Parser;
use config::EngineConfig;
use ingest::{IngestEvent, IngestSource, ReplaySource};
use metrics::EngineMetrics;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "arb-engine")]
#[command(about = "Cross-venue Solana arbitrage engine", version)]
struct Cli {
    /// Path to the engine's TOML configuration file.
    #[arg(short, long, default_value = "arb-engine.toml")]
    config: String,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Force dry-run mode regardless of the config file.
    #[arg(long)]
    dry_run: bool,
}

fn init_logging(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("arb_engine={log_level},arb_cache={log_level}").into());
    tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer().compact()).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut engine_config = match EngineConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if cli.dry_run {
        engine_config.dry_run = true;
    }

    let log_level = cli.log_level.unwrap_or_else(|| engine_config.monitoring.log_level.clone());
    init_logging(&log_level);

    info!("starting arb-engine");
    info!(dry_run = engine_config.dry_run, "configuration loaded");

    let program_owners = match engine_config.program_owners.to_program_owners() {
        Ok(owners) => owners,
        Err(reason) => {
            error!(%reason, "invalid program owner configuration");
            std::process::exit(1);
        }
    };

    let metrics = Arc::new(EngineMetrics::new());
    let metrics_bind = engine_config.monitoring.metrics_bind_address.clone();
    let metrics_for_server = metrics.clone();
    let metrics_handle = tokio::spawn(async move {
        if let Err(e) = metrics::serve_metrics(metrics_for_server, &metrics_bind).await {
            error!(error = %e, "metrics server stopped");
        }
    });

    let dispatcher = Dispatcher::new(program_owners);
    let mut cache = IngestCache::new(Arc::new(CountingRollbackObserver::default()));
    let mut pending_queue = PendingQueue::new(PendingQueueConfig {
        max_size: engine_config.pending_queue.max_size,
        expiration_slots: engine_config.pending_queue.expiration_slots,
        expiration_ms: engine_config.pending_queue.expiration_ms,
    });

    let submitter = Submitter::new(
        TestTransport::default(),
        SubmitterConfig { max_retries: engine_config.submitter.max_retries, dry_run: engine_config.dry_run },
    );

    let mut source: Box<dyn IngestSource> = Box::new(ReplaySource::new(Vec::new()));

    info!("hot path ready, consuming ingest source");
    while let Some(event) = source.next_event().await {
        match event {
            IngestEvent::Update(update) => {
                pipeline::apply_update(&mut cache, &dispatcher, &metrics, update);
            }
            IngestEvent::Rollback { pubkey, observed_slot } => {
                metrics.slot_rollbacks_total.inc();
                warn!(%pubkey, observed_slot, "rollback observed");
            }
        }
    }

    info!("ingest source exhausted, shutting down");
    metrics_handle.abort();
    let snapshot = submitter.counters.snapshot();
    info!(sent = snapshot.sent, landing_rate = snapshot.landing_rate(), pending = pending_queue.len(), "final submission counters");
}
