//! The external block-builder endpoint, modeled as a trait so the engine
//! never depends on a specific network or auth client.

use arb_bundle::Bundle;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleState {
    Accepted,
    Processed,
    Finalized,
    Rejected,
    Dropped,
}

#[derive(Debug, Clone)]
pub struct BundleResultEvent {
    pub id: String,
    pub state: BundleState,
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<String, String>;

    /// Pulls the next batch of reconciliation events from the result
    /// stream. An empty vec means "nothing new yet", not end-of-stream;
    /// the caller is expected to poll this in a loop.
    async fn poll_results(&self) -> Result<Vec<BundleResultEvent>, String>;
}

/// Deterministic in-memory transport for tests and dry runs.
pub struct TestTransport {
    pub next_id: std::sync::atomic::AtomicU64,
}

impl Default for TestTransport {
    fn default() -> Self {
        Self { next_id: std::sync::atomic::AtomicU64::new(1) }
    }
}

#[async_trait]
impl SubmissionTransport for TestTransport {
    async fn submit_bundle(&self, _bundle: &Bundle) -> Result<String, String> {
        let id = self.next_id.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(id.to_string())
    }

    async fn poll_results(&self) -> Result<Vec<BundleResultEvent>, String> {
        Ok(Vec::new())
    }
}
