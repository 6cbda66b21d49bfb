//! CLMM (Q64.64 sqrt-price) swap loop: crosses tick boundaries, applying
//! `liquidity_net` at each crossing, accumulating fee per step.

use crate::result::{price_impact_bps as impact_bps_for_q64, SimError, SwapOutcome};
use arb_math::clmm::{
    amount0_delta, amount1_delta, apply_liquidity_net_on_cross, next_sqrt_price_from_input, sqrt_price_q64_to_tick, tick_to_sqrt_price_q64,
};
use arb_types::{Tick, CLMM_MAX_ITERATIONS, MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClmmState {
    pub sqrt_price_q64: u128,
    pub liquidity: u128,
    pub tick_current: i32,
    pub fee_bps: u32,
}

/// Finds the nearest initialized tick strictly on the far side of
/// `current_tick` in the swap direction. `ticks` must be sorted ascending.
fn next_initialized_tick(ticks: &[Tick], current_tick: i32, zero_for_one: bool) -> Option<i32> {
    if zero_for_one {
        ticks.iter().rev().filter(|t| t.initialized && t.tick < current_tick).map(|t| t.tick).next()
    } else {
        ticks.iter().filter(|t| t.initialized && t.tick > current_tick).map(|t| t.tick).next()
    }
}

/// Simulates an exact-input swap across zero or more tick crossings.
/// `ticks` should cover every tick array the pool froze as a dependency,
/// concatenated and sorted ascending by `tick`.
pub fn simulate_exact_input(state: ClmmState, ticks: &[Tick], zero_for_one: bool, input: u64) -> SwapOutcome<ClmmState> {
    if state.liquidity == 0 {
        return SwapOutcome::failure(state, SimError::InsufficientLiquidity);
    }

    let mut sqrt_price = state.sqrt_price_q64;
    let mut liquidity = state.liquidity;
    let mut tick_current = state.tick_current;
    let mut remaining = input as u128;
    let mut total_out: u128 = 0;
    let mut total_fee: u128 = 0;
    let mut liquidity_exhausted = false;
    let price_before = sqrt_price;

    for _ in 0..CLMM_MAX_ITERATIONS {
        if remaining == 0 {
            break;
        }

        let boundary_tick = next_initialized_tick(ticks, tick_current, zero_for_one)
            .unwrap_or(if zero_for_one { MIN_TICK } else { MAX_TICK });
        let target_sqrt_price = match tick_to_sqrt_price_q64(boundary_tick) {
            Ok(p) => p,
            Err(_) => if zero_for_one { MIN_SQRT_PRICE_X64 } else { MAX_SQRT_PRICE_X64 },
        };

        let fee_amount = remaining * state.fee_bps as u128 / 10_000;
        let remaining_after_fee = remaining - fee_amount;

        let (lower, upper) = if zero_for_one {
            (target_sqrt_price, sqrt_price)
        } else {
            (sqrt_price, target_sqrt_price)
        };

        let max_amount_to_boundary = if zero_for_one {
            amount0_delta(lower, upper, liquidity, true).unwrap_or(u128::MAX)
        } else {
            amount1_delta(lower, upper, liquidity, true).unwrap_or(u128::MAX)
        };

        let reaches_boundary = remaining_after_fee >= max_amount_to_boundary;
        let step_sqrt_price_next = if reaches_boundary {
            target_sqrt_price
        } else {
            next_sqrt_price_from_input(sqrt_price, liquidity, remaining_after_fee, zero_for_one).unwrap_or(target_sqrt_price)
        };

        let (step_in, step_out) = if zero_for_one {
            let input_used = amount0_delta(step_sqrt_price_next, sqrt_price, liquidity, true).unwrap_or(0);
            let output = amount1_delta(step_sqrt_price_next, sqrt_price, liquidity, false).unwrap_or(0);
            (input_used, output)
        } else {
            let input_used = amount1_delta(sqrt_price, step_sqrt_price_next, liquidity, true).unwrap_or(0);
            let output = amount0_delta(sqrt_price, step_sqrt_price_next, liquidity, false).unwrap_or(0);
            (input_used, output)
        };

        let step_fee = if reaches_boundary {
            fee_amount.min(remaining)
        } else {
            remaining - step_in.min(remaining)
        };

        total_out += step_out;
        total_fee += step_fee;
        remaining = remaining.saturating_sub(step_in + step_fee);
        sqrt_price = step_sqrt_price_next;

        if reaches_boundary {
            if let Some(tick) = ticks.iter().find(|t| t.tick == boundary_tick && t.initialized) {
                liquidity = apply_liquidity_net_on_cross(liquidity, tick.liquidity_net, zero_for_one).unwrap_or(liquidity);
            }
            tick_current = if zero_for_one { boundary_tick - 1 } else { boundary_tick };
            if liquidity == 0 || boundary_tick == MIN_TICK || boundary_tick == MAX_TICK {
                liquidity_exhausted = true;
                break;
            }
        } else {
            // Didn't reach the boundary: the new tick tracks the actual
            // resulting price, not the boundary we were aiming at.
            tick_current = sqrt_price_q64_to_tick(sqrt_price).unwrap_or(tick_current);
        }
    }

    if remaining != 0 && !liquidity_exhausted {
        return SwapOutcome::failure(state, SimError::IterationCapExceeded);
    }
    if total_out == 0 {
        return SwapOutcome::failure(state, SimError::InsufficientLiquidity);
    }
    if total_out > u64::MAX as u128 || total_fee > u64::MAX as u128 {
        return SwapOutcome::failure(state, SimError::InvalidInput);
    }

    let new_state = ClmmState {
        sqrt_price_q64: sqrt_price,
        liquidity,
        tick_current,
        fee_bps: state.fee_bps,
    };

    SwapOutcome {
        success: true,
        output_amount: total_out as u64,
        new_state,
        price_impact_bps: impact_bps_for_q64(price_before, sqrt_price),
        fee_paid: total_fee as u64,
        error: None,
    }
}
