//! The typed update the cache commits. Produced by running an
//! `arb_types::IngestUpdate`'s raw bytes through `arb-decode`.

use arb_types::{AmmConfig, BinArray, GlobalConfig, Pool, Pubkey, TickArray, UpdateSource, Version};

#[derive(Debug, Clone)]
pub enum CachePayload {
    Pool(Pool),
    VaultAmount(u64),
    TickArray(TickArray),
    BinArray(BinArray),
    AmmConfig(AmmConfig),
    GlobalConfig(GlobalConfig),
}

#[derive(Debug, Clone)]
pub struct CacheUpdate {
    pub pubkey: Pubkey,
    pub version: Version,
    pub data_len: usize,
    pub source: UpdateSource,
    pub payload: CachePayload,
}
