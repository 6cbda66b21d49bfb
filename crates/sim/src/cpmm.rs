use crate::result::{price_impact_bps as impact_bps_for_q64, SimError, SwapOutcome};
use arb_math::cpmm::{get_amount_out, get_amount_in};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpmmState {
    pub reserve_base: u64,
    pub reserve_quote: u64,
    pub fee_bps: u32,
}

impl CpmmState {
    fn spot_price_quote_per_base_q64(&self) -> u128 {
        if self.reserve_base == 0 {
            return 0;
        }
        ((self.reserve_quote as u128) << 64) / self.reserve_base as u128
    }
}

/// Simulates an exact-input swap. `base_to_quote = true` sells base for quote.
pub fn simulate_exact_input(state: CpmmState, base_to_quote: bool, input: u64) -> SwapOutcome<CpmmState> {
    if state.reserve_base == 0 || state.reserve_quote == 0 {
        return SwapOutcome::failure(state, SimError::InsufficientLiquidity);
    }

    let (reserve_in, reserve_out) = if base_to_quote {
        (state.reserve_base, state.reserve_quote)
    } else {
        (state.reserve_quote, state.reserve_base)
    };

    let price_before = state.spot_price_quote_per_base_q64();

    let output = match get_amount_out(input, reserve_in, reserve_out, state.fee_bps) {
        Ok(out) if out > 0 && out < reserve_out => out,
        Ok(_) => return SwapOutcome::failure(state, SimError::InsufficientLiquidity),
        Err(_) => return SwapOutcome::failure(state, SimError::InvalidInput),
    };

    let fee_paid = (input as u128 * state.fee_bps as u128 / 10_000) as u64;

    let new_state = if base_to_quote {
        CpmmState {
            reserve_base: state.reserve_base + input,
            reserve_quote: state.reserve_quote - output,
            fee_bps: state.fee_bps,
        }
    } else {
        CpmmState {
            reserve_quote: state.reserve_quote + input,
            reserve_base: state.reserve_base - output,
            fee_bps: state.fee_bps,
        }
    };

    let price_after = new_state.spot_price_quote_per_base_q64();

    SwapOutcome {
        success: true,
        output_amount: output,
        new_state,
        price_impact_bps: impact_bps_for_q64(price_before, price_after),
        fee_paid,
        error: None,
    }
}

/// The input required to receive exactly `desired_output`, without mutating
/// any state — used to reconstruct a victim's input from an exact-output leg.
pub fn required_input_for_exact_output(state: CpmmState, base_to_quote: bool, desired_output: u64) -> Option<u64> {
    let (reserve_in, reserve_out) = if base_to_quote {
        (state.reserve_base, state.reserve_quote)
    } else {
        (state.reserve_quote, state.reserve_base)
    };
    get_amount_in(desired_output, reserve_in, reserve_out, state.fee_bps).ok()
}
