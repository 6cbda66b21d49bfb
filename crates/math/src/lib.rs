//! Fixed-point arithmetic and per-venue swap kernels.
//!
//! Nothing here touches the cache or does I/O: every function is pure and
//! takes its inputs by value. `arb-sim` composes these into the full
//! per-venue simulation kernels.

pub mod clmm;
pub mod cpmm;
pub mod dlmm;
pub mod safe;

pub use clmm::*;
pub use cpmm::*;
pub use dlmm::*;
pub use safe::*;
