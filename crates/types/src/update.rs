//! The ingest envelope handed from the source layer to the cache.

use crate::pubkey::Pubkey;
use serde::{Deserialize, Serialize};

/// Where an account update came from. Canonical writes (live Geyser stream)
/// always admit; Bootstrap writes (initial snapshot load) only admit when
/// no canonical write has been seen yet for that key, so a slow snapshot
/// can never clobber a fresher live update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateSource {
    Canonical,
    Bootstrap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestUpdate {
    pub pubkey: Pubkey,
    pub owner: Pubkey,
    pub slot: u64,
    pub write_version: u64,
    pub data: Vec<u8>,
    pub source: UpdateSource,
}

impl IngestUpdate {
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}
