//! `prometheus` registry plus the `axum` route that exposes it in text
//! exposition format, mirroring the indexer's metrics server.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub struct EngineMetrics {
    registry: Registry,

    pub decode_latency_us: Histogram,
    pub sim_latency_us: Histogram,
    pub decision_latency_us: Histogram,
    pub bundle_latency_us: Histogram,
    pub total_latency_us: Histogram,

    pub ingests_total: IntCounter,
    pub decode_drops_total: IntCounter,
    pub cache_size: IntGauge,
    pub alt_hits_total: IntCounter,
    pub alt_misses_total: IntCounter,
    pub sim_success_total: IntCounter,
    pub sim_failure_total: IntCounter,
    pub bundles_sent_total: IntCounter,
    pub bundles_landed_total: IntCounter,
    pub bundles_failed_total: IntCounter,
    pub slot_rollbacks_total: IntCounter,
}

fn latency_histogram(name: &str, help: &str) -> Histogram {
    let buckets = vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 5_000.0];
    Histogram::with_opts(HistogramOpts::new(name, help).buckets(buckets)).expect("static histogram opts are always valid")
}

impl EngineMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let decode_latency_us = latency_histogram("arb_decode_latency_us", "Account decode latency in microseconds");
        let sim_latency_us = latency_histogram("arb_sim_latency_us", "Swap simulation latency in microseconds");
        let decision_latency_us = latency_histogram("arb_decision_latency_us", "Opportunity decision latency in microseconds");
        let bundle_latency_us = latency_histogram("arb_bundle_latency_us", "Bundle build latency in microseconds");
        let total_latency_us = latency_histogram("arb_total_latency_us", "End-to-end hot path latency in microseconds");

        let ingests_total = IntCounter::new("arb_ingests_total", "Total account updates received").unwrap();
        let decode_drops_total = IntCounter::new("arb_decode_drops_total", "Total updates dropped by the decoder").unwrap();
        let cache_size = IntGauge::new("arb_cache_size", "Total entries held across cache stores").unwrap();
        let alt_hits_total = IntCounter::new("arb_alt_hits_total", "Address lookup table resolution hits").unwrap();
        let alt_misses_total = IntCounter::new("arb_alt_misses_total", "Address lookup table resolution misses").unwrap();
        let sim_success_total = IntCounter::new("arb_sim_success_total", "Successful simulations").unwrap();
        let sim_failure_total = IntCounter::new("arb_sim_failure_total", "Failed simulations").unwrap();
        let bundles_sent_total = IntCounter::new("arb_bundles_sent_total", "Bundles submitted").unwrap();
        let bundles_landed_total = IntCounter::new("arb_bundles_landed_total", "Bundles finalized").unwrap();
        let bundles_failed_total = IntCounter::new("arb_bundles_failed_total", "Bundles rejected or dropped").unwrap();
        let slot_rollbacks_total = IntCounter::new("arb_slot_rollbacks_total", "Observed slot rollbacks").unwrap();

        for metric in [&decode_latency_us, &sim_latency_us, &decision_latency_us, &bundle_latency_us, &total_latency_us] {
            registry.register(Box::new(metric.clone())).expect("metric names are unique");
        }
        for metric in [
            &ingests_total,
            &decode_drops_total,
            &alt_hits_total,
            &alt_misses_total,
            &sim_success_total,
            &sim_failure_total,
            &bundles_sent_total,
            &bundles_landed_total,
            &bundles_failed_total,
            &slot_rollbacks_total,
        ] {
            registry.register(Box::new(metric.clone())).expect("metric names are unique");
        }
        registry.register(Box::new(cache_size.clone())).expect("metric names are unique");

        Self {
            registry,
            decode_latency_us,
            sim_latency_us,
            decision_latency_us,
            bundle_latency_us,
            total_latency_us,
            ingests_total,
            decode_drops_total,
            cache_size,
            alt_hits_total,
            alt_misses_total,
            sim_success_total,
            sim_failure_total,
            bundles_sent_total,
            bundles_landed_total,
            bundles_failed_total,
            slot_rollbacks_total,
        }
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

async fn metrics_handler(State(metrics): State<Arc<EngineMetrics>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let families = metrics.registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer).expect("text encoding never fails for well-formed metric families");
    (axum::http::StatusCode::OK, buffer)
}

/// Serves `GET /metrics` in Prometheus text format until the process exits.
pub async fn serve_metrics(metrics: Arc<EngineMetrics>, bind_address: &str) -> std::io::Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler)).with_state(metrics);
    let listener = TcpListener::bind(bind_address).await?;
    info!(%bind_address, "metrics server listening");
    axum::serve(listener, app).await
}
