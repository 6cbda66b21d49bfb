//! Scheduled cross-venue spread scan. Compares the most recent spot price
//! observed for a token on each venue and flags a candidate when two
//! venues disagree by more than the configured threshold.

use crate::error::{OpportunityError, OpportunityResult};
use arb_types::Pubkey;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct PriceObservation {
    pub venue: &'static str,
    pub price_q64: u128,
    pub slot: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadOpportunity {
    pub token_mint: Pubkey,
    pub high_venue: &'static str,
    pub low_venue: &'static str,
    pub high_price_q64: u128,
    pub low_price_q64: u128,
    pub spread_bps: u64,
}

const SANITY_CAP_BPS: u64 = arb_types::constants::defaults::SPREAD_SANITY_CAP_BPS;

/// `(max - min) * 10_000 / min`, rejecting anything above the sanity cap
/// outright rather than emitting an implausible opportunity.
fn spread_bps(low: u128, high: u128) -> Option<u64> {
    if low == 0 {
        return None;
    }
    let diff = high.saturating_sub(low);
    let bps = (diff.saturating_mul(10_000)) / low;
    let bps = u64::try_from(bps).unwrap_or(u64::MAX);
    if bps > SANITY_CAP_BPS {
        None
    } else {
        Some(bps)
    }
}

/// Finds the best (highest vs lowest) spread among observations of a
/// single token across venues. Returns `None` when fewer than two venues
/// are represented or the spread fails the sanity check.
pub fn find_spread(token_mint: Pubkey, observations: &[PriceObservation]) -> OpportunityResult<Option<SpreadOpportunity>> {
    if observations.len() < 2 {
        return Ok(None);
    }
    let high = observations.iter().max_by_key(|o| o.price_q64).unwrap();
    let low = observations.iter().min_by_key(|o| o.price_q64).unwrap();
    if high.venue == low.venue {
        return Ok(None);
    }

    match spread_bps(low.price_q64, high.price_q64) {
        None => Err(OpportunityError::SanityRejected { reason: format!("spread exceeds {SANITY_CAP_BPS} bps sanity cap") }),
        Some(bps) => Ok(Some(SpreadOpportunity {
            token_mint,
            high_venue: high.venue,
            low_venue: low.venue,
            high_price_q64: high.price_q64,
            low_price_q64: low.price_q64,
            spread_bps: bps,
        })),
    }
}

/// Tracks per-token cooldowns so the periodic scan does not re-emit the
/// same candidate every tick.
pub struct SpreadScanner {
    min_spread_bps: u64,
    cooldown_ms: i64,
    last_scanned_ms: HashMap<Pubkey, i64>,
}

impl SpreadScanner {
    pub fn new(min_spread_bps: u64, cooldown_ms: i64) -> Self {
        Self { min_spread_bps, cooldown_ms, last_scanned_ms: HashMap::new() }
    }

    /// Evaluates one token's observations against the cooldown and the
    /// minimum-spread threshold, recording a scan timestamp on success.
    pub fn scan(&mut self, token_mint: Pubkey, observations: &[PriceObservation], now_ms: i64) -> OpportunityResult<Option<SpreadOpportunity>> {
        if let Some(last) = self.last_scanned_ms.get(&token_mint) {
            if now_ms.saturating_sub(*last) < self.cooldown_ms {
                return Err(OpportunityError::Cooldown { token: token_mint.to_string() });
            }
        }
        self.last_scanned_ms.insert(token_mint, now_ms);

        let found = find_spread(token_mint, observations)?;
        Ok(found.filter(|opp| opp.spread_bps >= self.min_spread_bps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(b: u8) -> Pubkey {
        Pubkey::new([b; 32])
    }

    #[test]
    fn two_venues_with_small_divergence_flagged() {
        let observations = vec![
            PriceObservation { venue: "pumpswap", price_q64: 1_000_000, slot: 1 },
            PriceObservation { venue: "raydium_clmm", price_q64: 1_010_000, slot: 1 },
        ];
        let found = find_spread(pk(1), &observations).unwrap().unwrap();
        assert_eq!(found.spread_bps, 100);
    }

    #[test]
    fn single_venue_yields_no_opportunity() {
        let observations = vec![PriceObservation { venue: "pumpswap", price_q64: 1_000_000, slot: 1 }];
        assert!(find_spread(pk(1), &observations).unwrap().is_none());
    }

    #[test]
    fn implausible_spread_is_sanity_rejected() {
        let observations = vec![
            PriceObservation { venue: "pumpswap", price_q64: 1, slot: 1 },
            PriceObservation { venue: "raydium_clmm", price_q64: 10_000_000_000u128, slot: 1 },
        ];
        assert!(matches!(find_spread(pk(1), &observations), Err(OpportunityError::SanityRejected { .. })));
    }

    #[test]
    fn cooldown_blocks_repeated_scans() {
        let mut scanner = SpreadScanner::new(55, 3_000);
        let observations = vec![
            PriceObservation { venue: "pumpswap", price_q64: 1_000_000, slot: 1 },
            PriceObservation { venue: "raydium_clmm", price_q64: 1_010_000, slot: 1 },
        ];
        assert!(scanner.scan(pk(1), &observations, 0).unwrap().is_some());
        assert!(matches!(scanner.scan(pk(1), &observations, 1_000), Err(OpportunityError::Cooldown { .. })));
        assert!(scanner.scan(pk(1), &observations, 4_000).unwrap().is_some());
    }

    #[test]
    fn third_venue_decoder_bug_price_rejects_the_whole_scan() {
        let observations = vec![
            PriceObservation { venue: "pumpswap", price_q64: 1_000_000, slot: 1 },
            PriceObservation { venue: "raydium_clmm", price_q64: 1_010_000, slot: 1 },
            PriceObservation { venue: "meteora_dlmm", price_q64: 10_000_000_000u128, slot: 1 },
        ];
        assert!(matches!(find_spread(pk(1), &observations), Err(OpportunityError::SanityRejected { .. })));
    }

    #[test]
    fn below_threshold_spread_is_filtered_out() {
        let mut scanner = SpreadScanner::new(500, 3_000);
        let observations = vec![
            PriceObservation { venue: "pumpswap", price_q64: 1_000_000, slot: 1 },
            PriceObservation { venue: "raydium_clmm", price_q64: 1_010_000, slot: 1 },
        ];
        assert!(scanner.scan(pk(1), &observations, 0).unwrap().is_none());
    }
}
