//! Bounded signature-keyed map with a lazily-rebuilt (slot ASC, signature
//! lex ASC) view.

use arb_types::{PendingTx, Pubkey};
use std::collections::HashMap;

pub struct PendingQueueConfig {
    pub max_size: usize,
    pub expiration_slots: u64,
    pub expiration_ms: i64,
}

impl Default for PendingQueueConfig {
    fn default() -> Self {
        Self {
            max_size: arb_types::constants::defaults::PENDING_QUEUE_MAX_SIZE,
            expiration_slots: arb_types::constants::defaults::PENDING_EXPIRATION_SLOTS,
            expiration_ms: arb_types::constants::defaults::PENDING_EXPIRATION_MS,
        }
    }
}

pub struct PendingQueue {
    config: PendingQueueConfig,
    entries: HashMap<String, PendingTx>,
    sorted_view: Vec<String>,
    dirty: bool,
}

impl PendingQueue {
    pub fn new(config: PendingQueueConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            sorted_view: Vec::new(),
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns false on duplicate signature (idempotent no-op, not an error).
    pub fn insert(&mut self, entry: PendingTx) -> bool {
        let key = entry.signature_hex();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        self.dirty = true;
        if self.entries.len() > self.config.max_size {
            self.evict_oldest_fraction(0.10);
        }
        true
    }

    /// Removes on confirmation. Returns false if the signature was unknown.
    pub fn confirm(&mut self, signature_hex: &str) -> bool {
        let removed = self.entries.remove(signature_hex).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Rebuilds the sorted view only if entries changed since the last call.
    pub fn get_ordered(&mut self) -> &[String] {
        if self.dirty {
            self.sorted_view = self.entries.keys().cloned().collect();
            self.sorted_view.sort_by(|a, b| {
                let ea = &self.entries[a];
                let eb = &self.entries[b];
                ea.slot_seen.cmp(&eb.slot_seen).then_with(|| a.cmp(b))
            });
            self.dirty = false;
        }
        &self.sorted_view
    }

    pub fn get(&self, signature_hex: &str) -> Option<&PendingTx> {
        self.entries.get(signature_hex)
    }

    pub fn get_for_pool(&self, pool_id: Pubkey) -> Vec<&PendingTx> {
        self.entries.values().filter(|tx| tx.touches_pool(pool_id)).collect()
    }

    /// Expires entries older than `head_slot - expiration_slots` or older
    /// than `expiration_ms`, whichever triggers first. Returns the count
    /// evicted.
    pub fn evict_expired(&mut self, head_slot: u64, now_ms: i64) -> usize {
        let before = self.entries.len();
        let expiration_slots = self.config.expiration_slots;
        let expiration_ms = self.config.expiration_ms;
        self.entries.retain(|_, tx| !tx.is_expired(head_slot, now_ms, expiration_slots, expiration_ms));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            self.dirty = true;
        }
        evicted
    }

    fn evict_oldest_fraction(&mut self, fraction: f64) {
        let to_evict = ((self.entries.len() as f64) * fraction).ceil() as usize;
        if to_evict == 0 {
            return;
        }
        let mut by_slot: Vec<(String, u64)> = self.entries.iter().map(|(k, v)| (k.clone(), v.slot_seen)).collect();
        by_slot.sort_by_key(|(_, slot)| *slot);
        for (key, _) in by_slot.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }
        self.dirty = true;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use arb_types::SwapLeg;
    use proptest::prelude::*;

    fn tx(sig: u8, slot: u64) -> PendingTx {
        PendingTx {
            signature: [sig; 64],
            slot_seen: slot,
            received_at_ms: 0,
            decoded_legs: vec![SwapLeg { pool_id: Pubkey::new([1; 32]), direction_a_to_b: true, amount_in: 1, minimum_amount_out: 0 }],
            raw_message: vec![],
        }
    }

    proptest! {
        #[test]
        fn ordered_view_is_non_decreasing_in_slot_then_signature(slots in prop::collection::vec(0u64..1_000, 1..40)) {
            let mut queue = PendingQueue::new(PendingQueueConfig { max_size: 10_000, expiration_slots: u64::MAX, expiration_ms: i64::MAX });
            for (i, slot) in slots.iter().enumerate() {
                queue.insert(tx(i as u8, *slot));
            }
            let ordered = queue.get_ordered().to_vec();
            for window in ordered.windows(2) {
                let a = queue.get(&window[0]).unwrap();
                let b = queue.get(&window[1]).unwrap();
                let in_order = a.slot_seen < b.slot_seen || (a.slot_seen == b.slot_seen && window[0] <= window[1]);
                prop_assert!(in_order);
            }
        }
    }
}
