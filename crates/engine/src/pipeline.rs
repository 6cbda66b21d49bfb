//! Turns a raw `IngestUpdate` into a `CacheUpdate` and commits it, timing
//! the decode step and bumping the relevant counters.

use crate::metrics::EngineMetrics;
use arb_cache::{CacheUpdate, CachePayload, CommitOutcome, IngestCache};
use arb_decode::dispatch::{DecodedAccount, Dispatcher};
use arb_types::{IngestUpdate, Version};
use std::time::Instant;

/// Decodes `update.data` through the dispatcher and, on success, commits
/// the resulting typed payload to the cache. Decode failures are dropped
/// with a counter bump rather than propagated, per the engine's error
/// categorization: the hot path never throws.
pub fn apply_update(cache: &mut IngestCache, dispatcher: &Dispatcher, metrics: &EngineMetrics, update: IngestUpdate) -> Option<CommitOutcome> {
    metrics.ingests_total.inc();
    let started = Instant::now();
    let decoded = dispatcher.decode(update.owner, &update.data);
    metrics.decode_latency_us.observe(started.elapsed().as_micros() as f64);

    let decoded = match decoded {
        Ok(decoded) => decoded,
        Err(_) => {
            metrics.decode_drops_total.inc();
            return None;
        }
    };

    let payload = match decoded {
        DecodedAccount::TokenVaultAmount(amount) => CachePayload::VaultAmount(amount),
        DecodedAccount::Pool(pool) => CachePayload::Pool(pool),
        DecodedAccount::AmmConfig(cfg) => CachePayload::AmmConfig(cfg),
    };

    let outcome = cache.commit(CacheUpdate {
        pubkey: update.pubkey,
        version: Version::new(update.slot, update.write_version),
        data_len: update.data_len(),
        source: update.source,
        payload,
    });

    metrics.cache_size.set(cache_size_estimate(cache) as i64);
    Some(outcome)
}

fn cache_size_estimate(cache: &IngestCache) -> usize {
    cache.vault_store().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_cache::CountingRollbackObserver;
    use arb_decode::dispatch::ProgramOwners;
    use arb_types::{Pubkey, UpdateSource};
    use std::sync::Arc;

    fn owners() -> ProgramOwners {
        ProgramOwners {
            spl_token: Pubkey::new([1; 32]),
            pumpswap: Pubkey::new([2; 32]),
            raydium_v4: Pubkey::new([3; 32]),
            raydium_clmm: Pubkey::new([4; 32]),
            meteora_dlmm: Pubkey::new([5; 32]),
        }
    }

    #[test]
    fn decode_failure_is_dropped_not_propagated() {
        let mut cache = IngestCache::new(Arc::new(CountingRollbackObserver::default()));
        let dispatcher = Dispatcher::new(owners());
        let metrics = EngineMetrics::new();
        let update = IngestUpdate { pubkey: Pubkey::new([9; 32]), owner: Pubkey::new([9; 32]), slot: 1, write_version: 0, data: vec![0u8; 3], source: UpdateSource::Canonical };
        let outcome = apply_update(&mut cache, &dispatcher, &metrics, update);
        assert!(outcome.is_none());
        assert_eq!(metrics.decode_drops_total.get(), 1);
    }

    #[test]
    fn spl_token_update_commits_vault_amount() {
        let mut cache = IngestCache::new(Arc::new(CountingRollbackObserver::default()));
        let dispatcher = Dispatcher::new(owners());
        let metrics = EngineMetrics::new();
        let mut data = vec![0u8; 165];
        data[64..72].copy_from_slice(&500u64.to_le_bytes());
        let update = IngestUpdate { pubkey: Pubkey::new([7; 32]), owner: owners().spl_token, slot: 1, write_version: 0, data, source: UpdateSource::Canonical };
        let outcome = apply_update(&mut cache, &dispatcher, &metrics, update).unwrap();
        assert!(outcome.applied);
        assert_eq!(cache.vault_amount(Pubkey::new([7; 32])), Some(500));
    }
}
