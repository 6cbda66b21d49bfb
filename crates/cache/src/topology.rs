//! Derives each pool's dependency set, freezes it, and promotes to Active
//! once every dependency has been observed.

use crate::store::VersionedStore;
use arb_math::{clmm::tick_array_start_index, dlmm::bin_array_index_and_offset};
use arb_types::{BinArray, ClmmPool, DlmmPool, Pool, Pubkey, TickArray, Topology};
use std::collections::HashMap;

/// Tick/bin arrays are frozen at `±RADIUS` arrays around the pool's current
/// position, matching the CLMM spec's 7-array window (center + 3 each side).
const ARRAY_RADIUS: i64 = 3;
const BINS_PER_ARRAY: i32 = 70;

#[derive(Debug, Clone, Default)]
pub struct MissingDependencies {
    pub vaults: Vec<Pubkey>,
    pub tick_arrays: Vec<Pubkey>,
    pub bin_arrays: Vec<Pubkey>,
    pub configs: Vec<Pubkey>,
}

impl MissingDependencies {
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty() && self.tick_arrays.is_empty() && self.bin_arrays.is_empty() && self.configs.is_empty()
    }
}

pub struct ActivationResult {
    pub activated: bool,
    pub missing: MissingDependencies,
}

/// Derives the dependency pubkey set for a pool. Tick/bin array pubkeys are
/// represented by a deterministic derivation key here (the real engine
/// would derive the actual on-chain PDA); the oracle only needs stable,
/// unique identifiers to track observation against.
pub fn derive_dependencies(pool_id: Pubkey, pool: &Pool) -> Vec<Pubkey> {
    match pool {
        Pool::ConstantProduct(cpmm) => vec![cpmm.base_vault, cpmm.quote_vault],
        Pool::BondingCurve(_) => vec![],
        Pool::Clmm(clmm) => derive_clmm_dependencies(pool_id, clmm),
        Pool::Dlmm(dlmm) => derive_dlmm_dependencies(pool_id, dlmm),
    }
}

fn derive_clmm_dependencies(_pool_id: Pubkey, clmm: &ClmmPool) -> Vec<Pubkey> {
    let mut deps = vec![clmm.vault_0, clmm.vault_1, clmm.amm_config_ref];
    let center = tick_array_start_index(clmm.tick_current, clmm.tick_spacing);
    let span = 60i32 * clmm.tick_spacing as i32;
    for i in -ARRAY_RADIUS..=ARRAY_RADIUS {
        let start = center + (i as i32) * span;
        deps.push(tick_array_key(clmm.vault_0, start));
    }
    deps
}

fn derive_dlmm_dependencies(_pool_id: Pubkey, dlmm: &DlmmPool) -> Vec<Pubkey> {
    let mut deps = vec![dlmm.reserve_x, dlmm.reserve_y];
    let (center_array, _) = bin_array_index_and_offset(dlmm.active_id, BINS_PER_ARRAY);
    for i in -ARRAY_RADIUS..=ARRAY_RADIUS {
        deps.push(bin_array_key(dlmm.reserve_x, center_array + i));
    }
    deps
}

/// Stable synthetic key for a tick array's slot in the dependency set,
/// derived from the pool's first vault and the array's start index.
fn tick_array_key(seed: Pubkey, start_tick_index: i32) -> Pubkey {
    synthetic_key(seed, start_tick_index as i64, b'T')
}

fn bin_array_key(seed: Pubkey, index: i64) -> Pubkey {
    synthetic_key(seed, index, b'B')
}

fn synthetic_key(seed: Pubkey, index: i64, tag: u8) -> Pubkey {
    let mut bytes = *seed.as_bytes();
    bytes[0] = tag;
    bytes[24..32].copy_from_slice(&index.to_le_bytes());
    Pubkey::new(bytes)
}

pub struct TopologyOracle {
    topologies: HashMap<Pubkey, Topology>,
    /// Synthetic reverse index from a dependency account to the pool it was
    /// frozen under. Built incrementally on `freeze`, since the real
    /// protocol carries no back-pointer from a vault/tick-array/bin-array
    /// account to its owning pool.
    dependency_owner: HashMap<Pubkey, Pubkey>,
}

impl Default for TopologyOracle {
    fn default() -> Self {
        Self { topologies: HashMap::new(), dependency_owner: HashMap::new() }
    }
}

impl TopologyOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discover(&mut self, pool_id: Pubkey) {
        self.topologies.entry(pool_id).or_insert_with(|| Topology::discovered(pool_id));
    }

    pub fn mark_observed(&mut self, pool_id: Pubkey, account: Pubkey) {
        if let Some(topology) = self.topologies.get_mut(&pool_id) {
            topology.mark_observed(account);
        }
    }

    pub fn mark_observed_everywhere(&mut self, account: Pubkey) {
        for topology in self.topologies.values_mut() {
            topology.mark_observed(account);
        }
    }

    pub fn freeze(&mut self, pool_id: Pubkey, pool: &Pool) -> bool {
        self.discover(pool_id);
        let dependencies = derive_dependencies(pool_id, pool);
        for dep in &dependencies {
            self.dependency_owner.insert(*dep, pool_id);
        }
        self.topologies.get_mut(&pool_id).expect("just discovered").freeze(dependencies)
    }

    /// True once `account` belongs to a pool whose lifecycle has left
    /// Discovered: non-canonical writes to such an account must be
    /// rejected regardless of whether a canonical write has landed yet.
    pub fn is_dependency_of_frozen_or_active(&self, account: Pubkey) -> bool {
        self.dependency_owner
            .get(&account)
            .and_then(|pool_id| self.topologies.get(pool_id))
            .map(|topology| !matches!(topology.state, arb_types::LifecycleState::Discovered))
            .unwrap_or(false)
    }

    /// Same rule as [`is_dependency_of_frozen_or_active`], applied to the
    /// pool's own pubkey rather than one of its dependency accounts. A pool
    /// can reach Frozen/Active purely through bootstrap writes without ever
    /// receiving a canonical write on its own pubkey, so `canonical_seen`
    /// alone does not protect it; this closes that gap.
    pub fn is_frozen_or_active(&self, pool_id: Pubkey) -> bool {
        self.topologies
            .get(&pool_id)
            .map(|topology| !matches!(topology.state, arb_types::LifecycleState::Discovered))
            .unwrap_or(false)
    }

    pub fn try_activate(
        &mut self,
        pool_id: Pubkey,
        vaults: &VersionedStore<Pubkey, u64>,
    ) -> ActivationResult {
        let Some(topology) = self.topologies.get_mut(&pool_id) else {
            return ActivationResult { activated: false, missing: MissingDependencies::default() };
        };

        let missing = if let Some(deps) = topology.dependencies() {
            let mut missing = MissingDependencies::default();
            for dep in deps {
                if !vaults.contains(dep) && !topology.observed.contains(dep) {
                    missing.vaults.push(*dep);
                }
            }
            missing
        } else {
            MissingDependencies::default()
        };

        let activated = missing.is_empty() && topology.try_activate();
        ActivationResult { activated, missing }
    }

    pub fn freeze_and_activate(&mut self, pool_id: Pubkey, pool: &Pool, vaults: &VersionedStore<Pubkey, u64>) -> ActivationResult {
        self.freeze(pool_id, pool);
        self.try_activate(pool_id, vaults)
    }

    pub fn is_active(&self, pool_id: Pubkey) -> bool {
        self.topologies.get(&pool_id).map(|t| t.is_active()).unwrap_or(false)
    }

    pub fn get(&self, pool_id: Pubkey) -> Option<&Topology> {
        self.topologies.get(&pool_id)
    }
}
