//! DLMM bin-walk swap: consumes liquidity in the active bin, then steps
//! ±1 bins toward the direction with liquidity, up to the walk cap.

use crate::result::{price_impact_bps as impact_bps_for_q64, SimError, SwapOutcome};
use arb_math::dlmm::{apply_dynamic_fee, dynamic_fee_rate_1e9, price_q64, swap_for_x, swap_for_y};
use arb_types::{Bin, DLMM_MAX_BIN_WALK, MAX_ACTIVE_ID_MAGNITUDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlmmState {
    pub active_id: i32,
    pub bin_step: u16,
    pub base_factor: u16,
    pub base_fee_power_factor: u8,
    pub variable_fee_control: u32,
    pub volatility_accumulator: u32,
    pub max_volatility_accumulator: u32,
}

/// `bins[i]` must be the bin at `active_id + i - center_offset`, i.e. a
/// window of consecutive bins centered (or starting) near `active_id`; the
/// caller supplies `window_start_id` so the kernel can index without doing
/// its own bin-array lookups.
pub fn simulate_exact_input(
    state: DlmmState,
    window_start_id: i32,
    bins: &mut [Bin],
    sell_x: bool,
    input: u64,
) -> SwapOutcome<DlmmState> {
    if bins.is_empty() {
        return SwapOutcome::failure(state, SimError::InsufficientLiquidity);
    }

    let fee_rate = dynamic_fee_rate_1e9(
        state.base_factor,
        state.bin_step,
        state.base_fee_power_factor,
        state.variable_fee_control,
        state.volatility_accumulator,
        state.max_volatility_accumulator,
    );
    let (amount_after_fee, fee_paid) = apply_dynamic_fee(input as u128, fee_rate);

    let price_before = match price_q64(state.active_id, state.bin_step) {
        Ok(p) => p,
        Err(_) => return SwapOutcome::failure(state, SimError::InvalidInput),
    };

    let mut remaining = amount_after_fee;
    let mut total_out: u128 = 0;
    let mut active_id = state.active_id;
    let direction: i32 = if sell_x { -1 } else { 1 };
    let mut walk_exhausted = false;

    for _ in 0..DLMM_MAX_BIN_WALK.min(bins.len() as u32) {
        if remaining == 0 {
            break;
        }
        if active_id.unsigned_abs() as i32 > MAX_ACTIVE_ID_MAGNITUDE {
            walk_exhausted = true;
            break;
        }

        let idx = (active_id - window_start_id) as isize;
        if idx < 0 || idx as usize >= bins.len() {
            walk_exhausted = true;
            break;
        }
        let bin = &mut bins[idx as usize];

        let price = match price_q64(active_id, state.bin_step) {
            Ok(p) => p,
            Err(_) => {
                walk_exhausted = true;
                break;
            }
        };

        let (output, consumed) = if sell_x {
            match swap_for_y(remaining, price, bin.amount_y) {
                Ok(v) => v,
                Err(_) => {
                    walk_exhausted = true;
                    break;
                }
            }
        } else {
            match swap_for_x(remaining, price, bin.amount_x) {
                Ok(v) => v,
                Err(_) => {
                    walk_exhausted = true;
                    break;
                }
            }
        };

        if sell_x {
            bin.amount_y = bin.amount_y.saturating_sub(output);
            bin.amount_x = bin.amount_x.saturating_add(consumed);
        } else {
            bin.amount_x = bin.amount_x.saturating_sub(output);
            bin.amount_y = bin.amount_y.saturating_add(consumed);
        }

        total_out += output;
        remaining = remaining.saturating_sub(consumed);

        let bin_exhausted = if sell_x { bin.amount_y == 0 } else { bin.amount_x == 0 };
        if remaining == 0 {
            break;
        }
        if !bin_exhausted {
            // Requested more than the bin could plausibly supply at this
            // price; treat as fully consumed to avoid an infinite loop.
            walk_exhausted = true;
            break;
        }
        active_id += direction;
    }

    if remaining != 0 && !walk_exhausted {
        return SwapOutcome::failure(state, SimError::IterationCapExceeded);
    }
    if total_out == 0 {
        return SwapOutcome::failure(state, SimError::InsufficientLiquidity);
    }
    if total_out > u64::MAX as u128 {
        return SwapOutcome::failure(state, SimError::InvalidInput);
    }

    let price_after = price_q64(active_id, state.bin_step).unwrap_or(price_before);
    let new_state = DlmmState { active_id, ..state };

    SwapOutcome {
        success: true,
        output_amount: total_out as u64,
        new_state,
        price_impact_bps: impact_bps_for_q64(price_before, price_after),
        fee_paid: fee_paid as u64,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DlmmState {
        DlmmState {
            active_id: 0,
            bin_step: 10,
            base_factor: 100,
            base_fee_power_factor: 0,
            variable_fee_control: 0,
            volatility_accumulator: 0,
            max_volatility_accumulator: 100_000,
        }
    }

    #[test]
    fn single_bin_swap_consumes_liquidity() {
        let mut bins = vec![Bin { amount_x: 1_000_000, amount_y: 1_000_000 }];
        let outcome = simulate_exact_input(state(), 0, &mut bins, true, 10_000);
        assert!(outcome.success);
        assert!(outcome.output_amount > 0);
    }

    #[test]
    fn empty_bins_fail() {
        let outcome = simulate_exact_input(state(), 0, &mut [], true, 10_000);
        assert!(!outcome.success);
    }

    /// 1001 consecutive bins each holding exactly 1 unit of the side being
    /// bought, zero fee: every bin drains in a single step, so the walk
    /// crosses one bin per iteration and a large input keeps it going past
    /// the 1000-bin cap with input still remaining. Must fail with
    /// `IterationCapExceeded`, not a partial-fill success.
    #[test]
    fn exceeding_the_bin_walk_cap_fails_instead_of_partial_filling() {
        let mut bins: Vec<Bin> = (0..1001).map(|_| Bin { amount_x: 0, amount_y: 1 }).collect();
        let zero_fee_state = DlmmState { bin_step: 1, base_factor: 0, variable_fee_control: 0, ..state() };
        // window_start_id = -1000 so active_id 0 (index 1000) walks down
        // through id -1000 (index 0) as sell_x steps by -1 each bin.
        let outcome = simulate_exact_input(zero_fee_state, -1000, &mut bins, true, 2_000_000);
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(SimError::IterationCapExceeded));
    }

    #[test]
    fn walk_moves_to_next_bin_when_current_exhausted() {
        let mut bins = vec![
            Bin { amount_x: 1_000, amount_y: 10 },
            Bin { amount_x: 1_000, amount_y: 1_000_000 },
        ];
        let outcome = simulate_exact_input(state(), 0, &mut bins, true, 1_000_000);
        assert!(outcome.success);
    }

    /// Selling x drives price down, so the walk steps from the active bin
    /// toward lower ids. Current bin (id 0) holds 1_000 x / 1_000 y; the
    /// bin it steps into (id -1) holds ample y. Draining bin 0 exactly and
    /// spilling the rest into bin -1 must land active_id at -1 with output
    /// strictly above bin 0's own 1_000 y.
    #[test]
    fn draining_active_bin_steps_to_the_next_lower_bin() {
        // window_start_id = -1 so bins[0] is id -1 (the spill target) and
        // bins[1] is id 0 (the active bin); index arithmetic is
        // `active_id - window_start_id`.
        let mut bins = vec![
            Bin { amount_x: 1_000, amount_y: 1_000_000 },
            Bin { amount_x: 1_000, amount_y: 1_000 },
        ];
        let zero_fee_state = DlmmState { base_factor: 0, variable_fee_control: 0, ..state() };
        let outcome = simulate_exact_input(zero_fee_state, -1, &mut bins, true, 1_500);
        assert!(outcome.success);
        assert_eq!(outcome.new_state.active_id, -1);
        assert!(outcome.output_amount > 1_000);
        assert!(outcome.output_amount <= 1_500);
    }
}
