//! Monotonic submission counters. Plain atomics rather than a metrics
//! registry — `arb-engine` is responsible for publishing these through
//! `prometheus`.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct SubmitCounters {
    pub sent: AtomicU64,
    pub accepted: AtomicU64,
    pub rejected: AtomicU64,
    pub processed: AtomicU64,
    pub finalized: AtomicU64,
    pub dropped: AtomicU64,
}

impl SubmitCounters {
    pub fn snapshot(&self) -> SubmitCountersSnapshot {
        SubmitCountersSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            finalized: self.finalized.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitCountersSnapshot {
    pub sent: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub processed: u64,
    pub finalized: u64,
    pub dropped: u64,
}

impl SubmitCountersSnapshot {
    /// `landed` is finalized once; the landing rate is `landed / sent`.
    pub fn landing_rate(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.finalized as f64 / self.sent as f64
        }
    }
}
