//! Victim-aware back-run search: reconstruct the victim's input, simulate
//! it once to get the post-victim reserves, then sweep a fixed
//! candidate-size ladder as a quote-in/base-out round trip purely against
//! that single state. No frontrun leg — the victim's own trade is what
//! moves the price the round trip profits from.

use crate::error::{OpportunityError, OpportunityResult};
use arb_sim::cpmm::{required_input_for_exact_output, simulate_exact_input, CpmmState};
use arb_sim::sequence::back_run_round_trip;

/// How the victim's leg declared its amount. A CPMM swap instruction is
/// either exact-input (amount_in fixed, output is a minimum) or
/// exact-output (amount_out fixed, input is a maximum).
#[derive(Debug, Clone, Copy)]
pub enum VictimIntent {
    ExactIn { amount_in: u64 },
    ExactOut { amount_out: u64, max_amount_in: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackRunOpportunity {
    pub candidate_input: u64,
    pub enter_output: u64,
    pub exit_output: u64,
    pub gross_profit: u64,
    pub net_profit: i128,
    pub enter_min_output: u64,
    pub exit_min_output: u64,
    pub post_victim_state: CpmmState,
}

pub struct BackRunParams {
    pub candidate_sizes: Vec<u64>,
    pub gas_cost_lamports: u64,
    pub tip_lamports: u64,
    pub min_profit_lamports: u64,
    pub slippage_bps: u32,
}

/// Reconstructs the victim's input amount against the pool state the cache
/// actually holds for it; exact-output legs are reversed through the CPMM
/// formula and clamped to the victim's declared max input.
fn victim_input_amount(pool_state: CpmmState, victim_base_to_quote: bool, intent: VictimIntent) -> Option<u64> {
    match intent {
        VictimIntent::ExactIn { amount_in } => Some(amount_in),
        VictimIntent::ExactOut { amount_out, max_amount_in } => {
            required_input_for_exact_output(pool_state, victim_base_to_quote, amount_out).map(|input| input.min(max_amount_in))
        }
    }
}

fn apply_slippage(amount: u64, slippage_bps: u32) -> u64 {
    let kept = 10_000u64.saturating_sub(slippage_bps.min(10_000) as u64);
    ((amount as u128) * (kept as u128) / 10_000) as u64
}

/// Runs the full back-run search: simulate the victim once against
/// `pool_state` to get the post-victim reserves, then for each candidate
/// size run the quote-in/base-out round trip purely against that one fixed
/// state, keeping the input maximizing gross profit (ties broken toward
/// the smaller input).
pub fn find_back_run(
    pool_state: CpmmState,
    victim_base_to_quote: bool,
    victim_intent: VictimIntent,
    params: &BackRunParams,
) -> OpportunityResult<BackRunOpportunity> {
    let victim_input = victim_input_amount(pool_state, victim_base_to_quote, victim_intent).ok_or(OpportunityError::VictimSimulationFailed)?;

    let victim_outcome = simulate_exact_input(pool_state, victim_base_to_quote, victim_input);
    if !victim_outcome.success {
        return Err(OpportunityError::VictimSimulationFailed);
    }
    let post_victim_state = victim_outcome.new_state;

    let mut best: Option<BackRunOpportunity> = None;

    for &candidate in &params.candidate_sizes {
        if candidate == 0 || candidate >= post_victim_state.reserve_quote {
            continue;
        }

        let enter = simulate_exact_input(post_victim_state, false, candidate);
        if !enter.success || enter.output_amount == 0 {
            continue;
        }

        let round_trip = match back_run_round_trip(post_victim_state, candidate) {
            Ok(outcome) if outcome.success && outcome.output_amount > 0 => outcome,
            _ => continue,
        };

        if round_trip.output_amount <= candidate {
            continue;
        }
        let gross_profit = round_trip.output_amount - candidate;

        let better = match &best {
            None => true,
            Some(current) => gross_profit > current.gross_profit || (gross_profit == current.gross_profit && candidate < current.candidate_input),
        };

        if better {
            best = Some(BackRunOpportunity {
                candidate_input: candidate,
                enter_output: enter.output_amount,
                exit_output: round_trip.output_amount,
                gross_profit,
                net_profit: 0,
                enter_min_output: apply_slippage(enter.output_amount, params.slippage_bps),
                exit_min_output: apply_slippage(round_trip.output_amount, params.slippage_bps),
                post_victim_state,
            });
        }
    }

    let mut best = best.ok_or(OpportunityError::NoProfitableCandidate)?;
    let net_profit = best.gross_profit as i128 - params.gas_cost_lamports as i128 - params.tip_lamports as i128;
    best.net_profit = net_profit;

    if net_profit < params.min_profit_lamports as i128 {
        return Err(OpportunityError::BelowProfitFloor { net: net_profit, floor: params.min_profit_lamports });
    }

    Ok(best)
}
