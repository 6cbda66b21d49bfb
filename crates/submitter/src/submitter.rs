//! Retry/backoff submission plus the result-stream reconciliation loop.

use crate::counters::SubmitCounters;
use crate::error::{SubmitError, SubmitResult};
use crate::transport::{BundleResultEvent, BundleState, SubmissionTransport};
use arb_bundle::Bundle;
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_CAP_MS: u64 = 1_000;

fn backoff_delay(attempt: u32) -> Duration {
    let scaled = BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(scaled.min(BACKOFF_CAP_MS))
}

pub struct SubmitterConfig {
    pub max_retries: u32,
    pub dry_run: bool,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            max_retries: arb_types::constants::defaults::SUBMITTER_MAX_RETRIES,
            dry_run: false,
        }
    }
}

pub struct Submitter<T: SubmissionTransport> {
    transport: T,
    config: SubmitterConfig,
    pub counters: SubmitCounters,
}

impl<T: SubmissionTransport> Submitter<T> {
    pub fn new(transport: T, config: SubmitterConfig) -> Self {
        Self { transport, config, counters: SubmitCounters::default() }
    }

    /// Submits with exponential backoff. In `dry_run` mode, records the
    /// would-have-submitted count and returns immediately without touching
    /// the transport.
    pub async fn submit(&self, bundle: &Bundle) -> SubmitResult<String> {
        self.counters.sent.fetch_add(1, Ordering::Relaxed);

        if self.config.dry_run {
            return Ok("dry-run".to_string());
        }

        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            match self.transport.submit_bundle(bundle).await {
                Ok(id) => {
                    self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                    return Ok(id);
                }
                Err(reason) => {
                    last_error = reason;
                    if attempt < self.config.max_retries {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        warn!(error = %last_error, "submission exhausted retries");
        Err(SubmitError::RetriesExhausted { attempts: self.config.max_retries + 1 })
    }

    /// Applies one reconciliation batch, deduping by id within each
    /// terminal state's seen set so a replayed event never double-counts.
    pub fn reconcile(&self, events: &[BundleResultEvent], seen: &mut SeenSets) {
        for event in events {
            let set = seen.set_for(event.state);
            if !set.insert(event.id.clone()) {
                continue;
            }
            match event.state {
                BundleState::Accepted => {}
                BundleState::Processed => {
                    self.counters.processed.fetch_add(1, Ordering::Relaxed);
                }
                BundleState::Finalized => {
                    self.counters.finalized.fetch_add(1, Ordering::Relaxed);
                }
                BundleState::Rejected => {
                    self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                }
                BundleState::Dropped => {
                    self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Loops forever while `active` returns true, polling the result
    /// stream and sleeping one second between reconnects.
    pub async fn run_result_stream(&self, active: impl Fn() -> bool, seen: &mut SeenSets) {
        while active() {
            match self.transport.poll_results().await {
                Ok(events) => self.reconcile(&events, seen),
                Err(reason) => warn!(%reason, "result stream read failed, reconnecting"),
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        info!("result stream reader stopped");
    }
}

#[derive(Default)]
pub struct SeenSets {
    accepted: HashSet<String>,
    processed: HashSet<String>,
    finalized: HashSet<String>,
    rejected: HashSet<String>,
    dropped: HashSet<String>,
}

impl SeenSets {
    fn set_for(&mut self, state: BundleState) -> &mut HashSet<String> {
        match state {
            BundleState::Accepted => &mut self.accepted,
            BundleState::Processed => &mut self.processed,
            BundleState::Finalized => &mut self.finalized,
            BundleState::Rejected => &mut self.rejected,
            BundleState::Dropped => &mut self.dropped,
        }
    }
}
