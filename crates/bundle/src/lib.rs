//! Synchronous bundle assembly: our two legs plus the victim's transaction
//! carried verbatim, signed through the `TransactionSigner` boundary.

pub mod builder;
pub mod error;
pub mod signer;

pub use builder::{build_bundle, estimate_compute_units, BuildOutcome, BuildParams, Bundle};
pub use error::{BundleError, BundleResult};
pub use signer::{NullSigner, SwapLegInstruction, TransactionSigner};
