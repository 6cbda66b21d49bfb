//! Pure, deterministic, allocation-light swap kernels, one per venue
//! family, plus the multi-step sequential replay used for sandwich and
//! back-run simulation. Nothing here touches the cache directly; callers
//! read pool/tick/bin state out of `arb-cache` and pass it in by value.

pub mod clmm;
pub mod cpmm;
pub mod dlmm;
pub mod result;
pub mod sequence;

pub use result::{price_impact_bps, SimError, SwapOutcome};
