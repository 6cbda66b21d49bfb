//! The pool tagged union and the records the cache keeps alongside it.

use crate::pubkey::Pubkey;
use serde::{Deserialize, Serialize};

/// A versioned record: every keyed store entry carries the (slot,
/// write_version) pair that orders it against later writes (invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub slot: u64,
    pub write_version: u64,
}

impl Version {
    pub const fn new(slot: u64, write_version: u64) -> Self {
        Self { slot, write_version }
    }

    /// True iff `self` is a valid successor to `previous` under the cache's
    /// admission rule: strictly greater (slot, write_version), lexicographically.
    pub fn supersedes(&self, previous: Option<Version>) -> bool {
        match previous {
            None => true,
            Some(p) => (self.slot, self.write_version) > (p.slot, p.write_version),
        }
    }
}

/// An SPL-token-style account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub amount: u64,
    pub version: Version,
}

/// One CLMM tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub tick: i32,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub initialized: bool,
}

impl Tick {
    pub const EMPTY: Tick = Tick {
        tick: 0,
        liquidity_net: 0,
        liquidity_gross: 0,
        initialized: false,
    };
}

/// A contiguous 60-tick segment of the CLMM tick space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickArray {
    pub pool_id: Pubkey,
    pub start_tick_index: i32,
    pub ticks: Vec<Tick>, // length TICKS_PER_ARRAY
    pub version: Version,
}

/// One DLMM bin: reserves of the X and Y token at a discrete price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    pub amount_x: u128,
    pub amount_y: u128,
}

impl Bin {
    pub const EMPTY: Bin = Bin { amount_x: 0, amount_y: 0 };
}

/// A contiguous 70-bin segment of the DLMM bin space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinArray {
    pub lb_pair: Pubkey,
    pub index: i64,
    pub bins: Vec<Bin>, // length BINS_PER_ARRAY
    pub version: Version,
}

/// Small fee/parameter record shared across multiple pools, referenced by pubkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmConfig {
    pub trade_fee_rate_bps: u32,
    pub protocol_fee_rate_bps: u32,
    pub version: Version,
}

/// Global protocol configuration referenced by pubkey (e.g. PumpSwap's
/// protocol-wide fee parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub lp_fee_bps: u32,
    pub protocol_fee_bps: u32,
    pub creator_fee_bps: u32,
    pub version: Version,
}

/// An address lookup table: only entries past the 56-byte header and after
/// the initialized discriminator check are considered valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressLookupTable {
    pub pubkey: Pubkey,
    pub addresses: Vec<Pubkey>,
    pub slot: u64,
}

/// CLMM pool status; only `Active` (0) pools are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    Active,
    Paused,
    Unknown(u8),
}

impl PoolStatus {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => PoolStatus::Active,
            1 => PoolStatus::Paused,
            other => PoolStatus::Unknown(other),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PoolStatus::Active)
    }
}

/// Optional realized-PnL accrual subtracted from vault balances to get
/// effective reserves (RaydiumV4's `need_take_pnl_coin/pc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PnlAccrual {
    pub base: u64,
    pub quote: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductPool {
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub lp_fee_bps: u32,
    pub protocol_fee_bps: u32,
    pub pnl_accrual: Option<PnlAccrual>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurvePool {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub creator: Pubkey,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClmmPool {
    pub amm_config_ref: Pubkey,
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub vault_0: Pubkey,
    pub vault_1: Pubkey,
    pub sqrt_price_q64: u128,
    pub liquidity: u128,
    pub tick_current: i32,
    pub tick_spacing: u16,
    pub mint_decimals_0: u8,
    pub mint_decimals_1: u8,
    pub status: PoolStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlmmPool {
    pub base_factor: u16,
    pub variable_fee_control: u32,
    pub volatility_accumulator: u32,
    pub max_volatility_accumulator: u32,
    pub active_id: i32,
    pub bin_step: u16,
    pub base_fee_power_factor: u8,
    pub token_x_mint: Pubkey,
    pub token_y_mint: Pubkey,
    pub reserve_x: Pubkey,
    pub reserve_y: Pubkey,
    pub status: PoolStatus,
}

/// Tagged union over the four supported venue families (invariant 1: a pool
/// pubkey maps to exactly one variant for its lifetime).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pool {
    ConstantProduct(ConstantProductPool),
    BondingCurve(BondingCurvePool),
    Clmm(ClmmPool),
    Dlmm(DlmmPool),
}

impl Pool {
    pub fn venue_name(&self) -> &'static str {
        match self {
            Pool::ConstantProduct(_) => "cpmm",
            Pool::BondingCurve(_) => "bonding_curve",
            Pool::Clmm(_) => "clmm",
            Pool::Dlmm(_) => "dlmm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub pubkey: Pubkey,
    pub pool: Pool,
    pub version: Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering_is_lexicographic() {
        let v1 = Version::new(100, 5);
        let v2 = Version::new(100, 6);
        let v3 = Version::new(101, 0);
        assert!(v2.supersedes(Some(v1)));
        assert!(v3.supersedes(Some(v2)));
        assert!(!v1.supersedes(Some(v2)));
    }

    #[test]
    fn equal_version_does_not_supersede() {
        let v = Version::new(10, 1);
        assert!(!v.supersedes(Some(v)));
    }

    #[test]
    fn none_previous_always_applies() {
        assert!(Version::new(0, 0).supersedes(None));
    }
}
