//! Single-writer ingest cache: versioned keyed stores plus the topology
//! oracle that promotes pools from Discovered through Frozen to Active.
//! Never suspends; every method here is synchronous and allocation-light.

pub mod error;
pub mod rollback;
pub mod store;
pub mod topology;
pub mod update;

pub use error::{CommitOutcome, CommitReject};
pub use rollback::{CountingRollbackObserver, RollbackEvent, RollbackObserver};
pub use store::{VersionedStore, WriteOutcome};
pub use topology::TopologyOracle;
pub use update::{CachePayload, CacheUpdate};

use arb_types::{AmmConfig, BinArray, GlobalConfig, Pool, Pubkey, TickArray, UpdateSource};
use std::collections::HashSet;
use std::sync::Arc;

pub struct IngestCache {
    pools: VersionedStore<Pubkey, Pool>,
    vaults: VersionedStore<Pubkey, u64>,
    tick_arrays: VersionedStore<Pubkey, TickArray>,
    bin_arrays: VersionedStore<Pubkey, BinArray>,
    amm_configs: VersionedStore<Pubkey, AmmConfig>,
    global_configs: VersionedStore<Pubkey, GlobalConfig>,
    topology: TopologyOracle,
    canonical_seen: HashSet<Pubkey>,
    highest_seen_slot: u64,
    first_slot: Option<u64>,
    rollback_observer: Arc<dyn RollbackObserver>,
}

impl IngestCache {
    pub fn new(rollback_observer: Arc<dyn RollbackObserver>) -> Self {
        Self {
            pools: VersionedStore::new(),
            vaults: VersionedStore::new(),
            tick_arrays: VersionedStore::new(),
            bin_arrays: VersionedStore::new(),
            amm_configs: VersionedStore::new(),
            global_configs: VersionedStore::new(),
            topology: TopologyOracle::new(),
            canonical_seen: HashSet::new(),
            highest_seen_slot: 0,
            first_slot: None,
            rollback_observer,
        }
    }

    /// Resets first-slot capture; call on stream reconnect.
    pub fn reset_first_slot(&mut self) {
        self.first_slot = None;
    }

    pub fn first_slot(&self) -> Option<u64> {
        self.first_slot
    }

    pub fn topology(&self) -> &TopologyOracle {
        &self.topology
    }

    pub fn topology_mut(&mut self) -> &mut TopologyOracle {
        &mut self.topology
    }

    pub fn pool(&self, pubkey: Pubkey) -> Option<&Pool> {
        self.pools.get(&pubkey)
    }

    pub fn vault_amount(&self, pubkey: Pubkey) -> Option<u64> {
        self.vaults.get(&pubkey).copied()
    }

    pub fn tick_array(&self, pubkey: Pubkey) -> Option<&TickArray> {
        self.tick_arrays.get(&pubkey)
    }

    pub fn bin_array(&self, pubkey: Pubkey) -> Option<&BinArray> {
        self.bin_arrays.get(&pubkey)
    }

    pub fn vault_store(&self) -> &VersionedStore<Pubkey, u64> {
        &self.vaults
    }

    pub fn commit(&mut self, update: CacheUpdate) -> CommitOutcome {
        if self.first_slot.is_none() {
            self.first_slot = Some(update.version.slot);
        }

        if update.version.slot < self.highest_seen_slot {
            self.rollback_observer.on_rollback(RollbackEvent {
                pubkey: update.pubkey,
                observed_slot: update.version.slot,
                highest_seen_slot: self.highest_seen_slot,
            });
        } else {
            self.highest_seen_slot = update.version.slot;
        }

        let is_dependency_write = !matches!(update.payload, CachePayload::Pool(_));
        let lifecycle_blocked = if is_dependency_write {
            self.topology.is_dependency_of_frozen_or_active(update.pubkey)
        } else {
            self.topology.is_frozen_or_active(update.pubkey)
        };
        if update.source == UpdateSource::Bootstrap && (self.canonical_seen.contains(&update.pubkey) || lifecycle_blocked) {
            return CommitOutcome::rejected(CommitReject::BlockedByLifecycle);
        }
        if update.source == UpdateSource::Canonical {
            self.canonical_seen.insert(update.pubkey);
        }

        let outcome = match update.payload {
            CachePayload::Pool(pool) => {
                self.topology.discover(update.pubkey);
                self.pools.insert(update.pubkey, update.version, pool)
            }
            CachePayload::VaultAmount(amount) => {
                let outcome = self.vaults.insert(update.pubkey, update.version, amount);
                self.topology.mark_observed_everywhere(update.pubkey);
                outcome
            }
            CachePayload::TickArray(arr) => {
                let outcome = self.tick_arrays.insert(update.pubkey, update.version, arr);
                self.topology.mark_observed_everywhere(update.pubkey);
                outcome
            }
            CachePayload::BinArray(arr) => {
                let outcome = self.bin_arrays.insert(update.pubkey, update.version, arr);
                self.topology.mark_observed_everywhere(update.pubkey);
                outcome
            }
            CachePayload::AmmConfig(cfg) => {
                let outcome = self.amm_configs.insert(update.pubkey, update.version, cfg);
                self.topology.mark_observed_everywhere(update.pubkey);
                outcome
            }
            CachePayload::GlobalConfig(cfg) => {
                let outcome = self.global_configs.insert(update.pubkey, update.version, cfg);
                self.topology.mark_observed_everywhere(update.pubkey);
                outcome
            }
        };

        match outcome {
            WriteOutcome::Applied => CommitOutcome::applied(),
            WriteOutcome::Stale => CommitOutcome::rejected(CommitReject::Stale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_types::{ConstantProductPool, Version};

    fn pk(b: u8) -> Pubkey {
        Pubkey::new([b; 32])
    }

    fn cache() -> IngestCache {
        IngestCache::new(Arc::new(CountingRollbackObserver::default()))
    }

    #[test]
    fn first_slot_is_captured_once() {
        let mut cache = cache();
        let update = CacheUpdate {
            pubkey: pk(1),
            version: Version::new(500, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::VaultAmount(1),
        };
        cache.commit(update);
        assert_eq!(cache.first_slot(), Some(500));
    }

    #[test]
    fn stale_write_is_rejected() {
        let mut cache = cache();
        let update = |slot, amount| CacheUpdate {
            pubkey: pk(1),
            version: Version::new(slot, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::VaultAmount(amount),
        };
        assert!(cache.commit(update(100, 10)).applied);
        let result = cache.commit(update(50, 20));
        assert!(!result.applied);
        assert_eq!(result.reason, Some(CommitReject::Stale));
        assert_eq!(cache.vault_amount(pk(1)), Some(10));
    }

    #[test]
    fn bootstrap_after_canonical_is_blocked() {
        let mut cache = cache();
        let canonical = CacheUpdate {
            pubkey: pk(1),
            version: Version::new(100, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::VaultAmount(10),
        };
        let bootstrap = CacheUpdate {
            pubkey: pk(1),
            version: Version::new(200, 0),
            data_len: 0,
            source: UpdateSource::Bootstrap,
            payload: CachePayload::VaultAmount(999),
        };
        cache.commit(canonical);
        let result = cache.commit(bootstrap);
        assert!(!result.applied);
        assert_eq!(result.reason, Some(CommitReject::BlockedByLifecycle));
    }

    #[test]
    fn bootstrap_to_frozen_dependency_is_blocked_before_any_canonical_write() {
        let mut cache = cache();
        let pool = Pool::ConstantProduct(ConstantProductPool {
            base_vault: pk(2),
            quote_vault: pk(3),
            lp_fee_bps: 20,
            protocol_fee_bps: 5,
            pnl_accrual: None,
        });
        cache.commit(CacheUpdate {
            pubkey: pk(1),
            version: Version::new(100, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::Pool(pool.clone()),
        });
        cache.topology_mut().freeze(pk(1), &pool);

        let result = cache.commit(CacheUpdate {
            pubkey: pk(2),
            version: Version::new(101, 0),
            data_len: 0,
            source: UpdateSource::Bootstrap,
            payload: CachePayload::VaultAmount(999),
        });
        assert!(!result.applied);
        assert_eq!(result.reason, Some(CommitReject::BlockedByLifecycle));
        assert_eq!(cache.vault_amount(pk(2)), None);

        let canonical = cache.commit(CacheUpdate {
            pubkey: pk(2),
            version: Version::new(102, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::VaultAmount(100),
        });
        assert!(canonical.applied);
    }

    #[test]
    fn bootstrap_only_pool_is_still_protected_once_frozen() {
        let mut cache = cache();
        let pool = Pool::ConstantProduct(ConstantProductPool {
            base_vault: pk(2),
            quote_vault: pk(3),
            lp_fee_bps: 20,
            protocol_fee_bps: 5,
            pnl_accrual: None,
        });
        // The pool itself never receives a canonical write, only bootstrap
        // writes, so `canonical_seen` never learns its pubkey.
        let first_bootstrap = cache.commit(CacheUpdate {
            pubkey: pk(1),
            version: Version::new(100, 0),
            data_len: 0,
            source: UpdateSource::Bootstrap,
            payload: CachePayload::Pool(pool.clone()),
        });
        assert!(first_bootstrap.applied);
        cache.topology_mut().freeze(pk(1), &pool);

        let clobber = cache.commit(CacheUpdate {
            pubkey: pk(1),
            version: Version::new(101, 0),
            data_len: 0,
            source: UpdateSource::Bootstrap,
            payload: CachePayload::Pool(pool),
        });
        assert!(!clobber.applied);
        assert_eq!(clobber.reason, Some(CommitReject::BlockedByLifecycle));
    }

    #[test]
    fn pool_commit_discovers_topology_entry() {
        let mut cache = cache();
        let pool = Pool::ConstantProduct(ConstantProductPool {
            base_vault: pk(2),
            quote_vault: pk(3),
            lp_fee_bps: 20,
            protocol_fee_bps: 5,
            pnl_accrual: None,
        });
        cache.commit(CacheUpdate {
            pubkey: pk(1),
            version: Version::new(100, 0),
            data_len: 0,
            source: UpdateSource::Canonical,
            payload: CachePayload::Pool(pool),
        });
        assert!(cache.topology().get(pk(1)).is_some());
    }
}
