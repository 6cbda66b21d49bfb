//! Assembles the three-element `[frontrun, victim_raw, backrun]` bundle.
//! Synchronous and allocation-light enough to run on the hot path.

use crate::error::BundleError;
use crate::signer::{SwapLegInstruction, TransactionSigner};
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct BuildParams {
    pub compute_unit_price: u64,
    pub tip_lamports: u64,
}

#[derive(Debug, Clone)]
pub struct Bundle {
    pub frontrun: Vec<u8>,
    pub victim_raw: Vec<u8>,
    pub backrun: Vec<u8>,
}

impl Bundle {
    pub fn as_transactions(&self) -> [&[u8]; 3] {
        [&self.frontrun, &self.victim_raw, &self.backrun]
    }
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub success: bool,
    pub bundle: Option<Bundle>,
    pub build_latency_us: u64,
    pub reason: Option<String>,
}

/// Monotonic in the number of legs: a fixed base plus a per-leg increment.
/// The real cost model (instruction count, account list size) is an
/// external collaborator's concern; this only needs to preserve ordering.
pub fn estimate_compute_units(leg_count: u32) -> u32 {
    const BASE_UNITS: u32 = 20_000;
    const UNITS_PER_LEG: u32 = 40_000;
    BASE_UNITS + UNITS_PER_LEG * leg_count
}

pub fn build_bundle(
    signer: &dyn TransactionSigner,
    frontrun: &SwapLegInstruction,
    victim_raw: &[u8],
    backrun: &SwapLegInstruction,
    params: &BuildParams,
) -> BuildOutcome {
    let started = Instant::now();

    if victim_raw.is_empty() {
        return failure(started, BundleError::EmptyVictim.to_string());
    }

    let compute_unit_limit = estimate_compute_units(2);

    let frontrun_bytes = match signer.sign_leg(frontrun, compute_unit_limit, params.compute_unit_price, params.tip_lamports) {
        Ok(bytes) => bytes,
        Err(reason) => return failure(started, BundleError::SigningFailed { leg: "frontrun", reason }.to_string()),
    };

    let backrun_bytes = match signer.sign_leg(backrun, compute_unit_limit, params.compute_unit_price, params.tip_lamports) {
        Ok(bytes) => bytes,
        Err(reason) => return failure(started, BundleError::SigningFailed { leg: "backrun", reason }.to_string()),
    };

    BuildOutcome {
        success: true,
        bundle: Some(Bundle { frontrun: frontrun_bytes, victim_raw: victim_raw.to_vec(), backrun: backrun_bytes }),
        build_latency_us: started.elapsed().as_micros() as u64,
        reason: None,
    }
}

fn failure(started: Instant, reason: String) -> BuildOutcome {
    BuildOutcome { success: false, bundle: None, build_latency_us: started.elapsed().as_micros() as u64, reason: Some(reason) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::NullSigner;
    use arb_types::Pubkey;

    fn leg() -> SwapLegInstruction {
        SwapLegInstruction { pool_id: Pubkey::new([1u8; 32]), direction_a_to_b: true, input_amount: 1_000, minimum_output: 900 }
    }

    #[test]
    fn successful_build_produces_three_transactions() {
        let outcome = build_bundle(&NullSigner, &leg(), &[0xab, 0xcd], &leg(), &BuildParams { compute_unit_price: 1, tip_lamports: 1000 });
        assert!(outcome.success);
        let bundle = outcome.bundle.unwrap();
        assert_eq!(bundle.as_transactions().len(), 3);
        assert_eq!(bundle.victim_raw, vec![0xab, 0xcd]);
    }

    #[test]
    fn empty_victim_bytes_fail_fast() {
        let outcome = build_bundle(&NullSigner, &leg(), &[], &leg(), &BuildParams { compute_unit_price: 1, tip_lamports: 1000 });
        assert!(!outcome.success);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn compute_unit_estimate_is_monotonic_in_leg_count() {
        assert!(estimate_compute_units(1) < estimate_compute_units(2));
        assert!(estimate_compute_units(2) < estimate_compute_units(3));
    }
}
