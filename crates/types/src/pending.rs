//! Decoded view of an unconfirmed transaction sitting in the pending queue.

use crate::pubkey::Pubkey;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

/// One swap instruction extracted from a pending transaction's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub pool_id: Pubkey,
    pub direction_a_to_b: bool,
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTx {
    #[serde(with = "BigArray")]
    pub signature: [u8; 64],
    pub slot_seen: u64,
    pub received_at_ms: i64,
    pub decoded_legs: Vec<SwapLeg>,
    pub raw_message: Vec<u8>,
}

impl PendingTx {
    pub fn signature_hex(&self) -> String {
        crate::pubkey::signature_to_hex(&self.signature)
    }

    pub fn touches_pool(&self, pool_id: Pubkey) -> bool {
        self.decoded_legs.iter().any(|leg| leg.pool_id == pool_id)
    }

    pub fn is_expired(&self, now_slot: u64, now_ms: i64, max_slots: u64, max_ms: i64) -> bool {
        now_slot.saturating_sub(self.slot_seen) > max_slots
            || now_ms.saturating_sub(self.received_at_ms) > max_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(b: u8) -> Pubkey {
        Pubkey::new([b; 32])
    }

    fn sample() -> PendingTx {
        PendingTx {
            signature: [7u8; 64],
            slot_seen: 1000,
            received_at_ms: 10_000,
            decoded_legs: vec![SwapLeg {
                pool_id: pk(1),
                direction_a_to_b: true,
                amount_in: 500,
                minimum_amount_out: 1,
            }],
            raw_message: vec![],
        }
    }

    #[test]
    fn touches_pool_matches_any_leg() {
        let tx = sample();
        assert!(tx.touches_pool(pk(1)));
        assert!(!tx.touches_pool(pk(2)));
    }

    #[test]
    fn expiration_checks_both_slot_and_time() {
        let tx = sample();
        assert!(!tx.is_expired(1100, 11_000, 150, 60_000));
        assert!(tx.is_expired(1200, 11_000, 150, 60_000));
        assert!(tx.is_expired(1100, 100_000, 150, 60_000));
    }
}
