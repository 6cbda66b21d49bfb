//! Slot-rollback detection. The cache's own state is never rewound; a
//! rollback only produces a notification so downstream consumers can decide
//! how conservative to be.

use arb_types::Pubkey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackEvent {
    pub pubkey: Pubkey,
    pub observed_slot: u64,
    pub highest_seen_slot: u64,
}

pub trait RollbackObserver: Send + Sync {
    fn on_rollback(&self, event: RollbackEvent);
}

/// Default observer: counts rollbacks without acting on them. Real
/// deployments wire a `RollbackObserver` that also emits a metric.
#[derive(Default)]
pub struct CountingRollbackObserver {
    count: std::sync::atomic::AtomicU64,
}

impl CountingRollbackObserver {
    pub fn count(&self) -> u64 {
        self.count.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl RollbackObserver for CountingRollbackObserver {
    fn on_rollback(&self, _event: RollbackEvent) {
        self.count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}
