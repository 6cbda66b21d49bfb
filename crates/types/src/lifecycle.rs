//! Three-state pool lifecycle: Discovered -> Frozen -> Active.
//!
//! A pool enters the cache the moment any of its constituent accounts is
//! observed (Discovered). Once its full dependency set is known it is
//! Frozen. Once every account in that set has been observed at least once
//! it is promoted to Active and becomes eligible for simulation.

use crate::pubkey::Pubkey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Discovered,
    Frozen { dependencies: Vec<Pubkey> },
    Active,
}

/// Per-pool bookkeeping the Topology Oracle maintains to decide when a
/// Frozen pool has all of its dependencies satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub pool_id: Pubkey,
    pub state: LifecycleState,
    pub observed: HashSet<Pubkey>,
}

impl Topology {
    pub fn discovered(pool_id: Pubkey) -> Self {
        Self {
            pool_id,
            state: LifecycleState::Discovered,
            observed: HashSet::new(),
        }
    }

    /// Freeze the dependency set. No-op (returns false) if already frozen
    /// or active, since a pool's venue and dependency set are immutable
    /// once decided.
    pub fn freeze(&mut self, dependencies: Vec<Pubkey>) -> bool {
        if !matches!(self.state, LifecycleState::Discovered) {
            return false;
        }
        self.state = LifecycleState::Frozen { dependencies };
        self.try_activate();
        true
    }

    /// Record that `account` has been observed at least once. Attempts
    /// promotion to Active if frozen and complete.
    pub fn mark_observed(&mut self, account: Pubkey) {
        self.observed.insert(account);
        self.try_activate();
    }

    /// Promote Frozen -> Active if every dependency has been observed.
    /// Returns true if promotion happened on this call.
    pub fn try_activate(&mut self) -> bool {
        let complete = match &self.state {
            LifecycleState::Frozen { dependencies } => {
                dependencies.iter().all(|d| self.observed.contains(d))
            }
            _ => false,
        };
        if complete {
            self.state = LifecycleState::Active;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LifecycleState::Active)
    }

    pub fn dependencies(&self) -> Option<&[Pubkey]> {
        match &self.state {
            LifecycleState::Frozen { dependencies } => Some(dependencies),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(b: u8) -> Pubkey {
        Pubkey::new([b; 32])
    }

    #[test]
    fn discovered_starts_inactive() {
        let t = Topology::discovered(pk(1));
        assert!(!t.is_active());
    }

    #[test]
    fn freeze_then_observe_all_activates() {
        let mut t = Topology::discovered(pk(1));
        t.freeze(vec![pk(2), pk(3)]);
        assert!(!t.is_active());
        t.mark_observed(pk(2));
        assert!(!t.is_active());
        t.mark_observed(pk(3));
        assert!(t.is_active());
    }

    #[test]
    fn observing_before_freeze_counts_toward_activation() {
        let mut t = Topology::discovered(pk(1));
        t.mark_observed(pk(2));
        t.freeze(vec![pk(2)]);
        assert!(t.is_active());
    }

    #[test]
    fn freeze_is_one_shot() {
        let mut t = Topology::discovered(pk(1));
        assert!(t.freeze(vec![pk(2)]));
        assert!(!t.freeze(vec![pk(3)]));
        assert_eq!(t.dependencies(), Some(&[pk(2)][..]));
    }
}
