//! Replays an ordered list of swap steps over a single CPMM pool, threading
//! each step's output into the next step's input. Used for multi-hop
//! routes, the three-step sandwich replay, and the back-run round-trip.

use crate::cpmm::{simulate_exact_input, CpmmState};
use crate::result::{SimError, SwapOutcome};

#[derive(Debug, Clone, Copy)]
pub struct SequentialStep {
    pub base_to_quote: bool,
    pub input: u64,
}

#[derive(Debug, Clone)]
pub struct SequentialResult {
    pub outputs: Vec<u64>,
    pub final_state: CpmmState,
    pub total_fee_paid: u64,
}

/// Replays `steps` in order over `initial_state`, updating reserves after
/// each step before the next one computes its output. Stops and reports
/// failure at the first step that cannot be satisfied.
pub fn replay(initial_state: CpmmState, steps: &[SequentialStep]) -> Result<SequentialResult, SimError> {
    let mut state = initial_state;
    let mut outputs = Vec::with_capacity(steps.len());
    let mut total_fee = 0u64;

    for step in steps {
        let outcome = simulate_exact_input(state, step.base_to_quote, step.input);
        if !outcome.success {
            return Err(outcome.error.unwrap_or(SimError::InsufficientLiquidity));
        }
        outputs.push(outcome.output_amount);
        total_fee += outcome.fee_paid;
        state = outcome.new_state;
    }

    Ok(SequentialResult {
        outputs,
        final_state: state,
        total_fee_paid: total_fee,
    })
}

/// The back-run round trip: quote-in on `post_victim_state`, then base-in
/// with input equal to the first leg's output.
pub fn back_run_round_trip(post_victim_state: CpmmState, quote_input: u64) -> Result<SwapOutcome<CpmmState>, SimError> {
    let enter = simulate_exact_input(post_victim_state, false, quote_input);
    if !enter.success {
        return Err(enter.error.unwrap_or(SimError::InsufficientLiquidity));
    }
    let exit = simulate_exact_input(enter.new_state, true, enter.output_amount);
    Ok(exit)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Negative property: swap order is not commutative. `replay` must
        // track the caller's declared order, not some canonicalized one.
        #[test]
        fn step_order_changes_the_outcome(
            reserve_base in 500_000u64..5_000_000,
            reserve_quote in 500_000u64..5_000_000,
            input_a in 1_000u64..50_000,
            input_b in 1_000u64..50_000,
        ) {
            let initial = CpmmState { reserve_base, reserve_quote, fee_bps: 25 };
            let step_a = SequentialStep { base_to_quote: true, input: input_a };
            let step_b = SequentialStep { base_to_quote: false, input: input_b };

            let forward = replay(initial, &[step_a, step_b]);
            let reversed = replay(initial, &[step_b, step_a]);

            if let (Ok(forward), Ok(reversed)) = (&forward, &reversed) {
                prop_assert_ne!(forward.final_state.reserve_base, reversed.final_state.reserve_base);

                // The forward order must match direct two-step chain semantics:
                // the second step's input is literally the first step's output.
                let first = crate::cpmm::simulate_exact_input(initial, step_a.base_to_quote, step_a.input);
                let second = crate::cpmm::simulate_exact_input(first.new_state, step_b.base_to_quote, step_b.input);
                prop_assert_eq!(forward.outputs[1], second.output_amount);
            }
        }
    }
}
