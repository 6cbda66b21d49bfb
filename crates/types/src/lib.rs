//! Shared data model for the cross-venue arbitrage engine.
//!
//! This crate holds the types every other crate agrees on: the pubkey
//! newtype, the four pool variants, the keyed/versioned records the cache
//! stores, and the lifecycle state machine. Nothing here touches I/O.

pub mod constants;
pub mod errors;
pub mod lifecycle;
pub mod pending;
pub mod pool;
pub mod pubkey;
pub mod update;

pub use constants::*;
pub use errors::*;
pub use lifecycle::*;
pub use pending::*;
pub use pool::*;
pub use pubkey::*;
pub use update::*;

pub type ArbResult<T> = std::result::Result<T, ArbError>;
