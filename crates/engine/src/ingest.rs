//! The abstract ingest stream. The real WebSocket/gRPC client is an
//! external collaborator; this crate only ships a replay source used for
//! development and the test suite.

use arb_types::IngestUpdate;
use async_trait::async_trait;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub enum IngestEvent {
    Update(IngestUpdate),
    Rollback { pubkey: arb_types::Pubkey, observed_slot: u64 },
}

#[async_trait]
pub trait IngestSource: Send {
    /// Returns the next event, or `None` once the source is exhausted.
    /// A live source would instead suspend until data arrives.
    async fn next_event(&mut self) -> Option<IngestEvent>;
}

/// Replays a fixed, pre-ordered sequence of events. `slot` is monotone
/// non-decreasing across `Update` events by construction of the caller;
/// `Rollback` events are passed through verbatim.
pub struct ReplaySource {
    events: VecDeque<IngestEvent>,
}

impl ReplaySource {
    pub fn new(events: Vec<IngestEvent>) -> Self {
        Self { events: events.into() }
    }
}

#[async_trait]
impl IngestSource for ReplaySource {
    async fn next_event(&mut self) -> Option<IngestEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_types::{Pubkey, UpdateSource};

    fn update(slot: u64) -> IngestUpdate {
        IngestUpdate { pubkey: Pubkey::new([1u8; 32]), owner: Pubkey::new([2u8; 32]), slot, write_version: 0, data: vec![], source: UpdateSource::Canonical }
    }

    #[tokio::test]
    async fn replay_source_yields_events_in_order_then_ends() {
        let mut source = ReplaySource::new(vec![IngestEvent::Update(update(1)), IngestEvent::Update(update(2))]);
        assert!(matches!(source.next_event().await, Some(IngestEvent::Update(u)) if u.slot == 1));
        assert!(matches!(source.next_event().await, Some(IngestEvent::Update(u)) if u.slot == 2));
        assert!(source.next_event().await.is_none());
    }
}
