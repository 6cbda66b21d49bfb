//! Constant-product swap formula shared by PumpSwap's CPMM mode and
//! RaydiumV4.

use crate::safe::{safe_add_u128, safe_div_u128, safe_mul_u128, safe_sub_u128};
use arb_types::{ArbError, ArbResult};

/// `output = Rout * in_after_fee / (Rin + in_after_fee)`, with the fee
/// subtracted from the input before it hits the curve. Full input (including
/// the fee) enters the reserves; only `output` leaves them.
pub fn get_amount_out(
    input: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u32,
) -> ArbResult<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(ArbError::division_by_zero("cpmm reserves"));
    }
    let in_after_fee = safe_div_u128(
        safe_mul_u128(input as u128, (10_000 - fee_bps.min(10_000)) as u128)?,
        10_000,
    )?;
    let numerator = safe_mul_u128(reserve_out as u128, in_after_fee)?;
    let denominator = safe_add_u128(reserve_in as u128, in_after_fee)?;
    let out = numerator / denominator.max(1);
    u128_to_u64(out, "cpmm amount_out")
}

/// Reverse of [`get_amount_out`]: the input required to receive exactly
/// `amount_out`, rounding the fee-adjusted input up so the forward formula
/// never under-delivers.
pub fn get_amount_in(
    amount_out: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u32,
) -> ArbResult<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(ArbError::division_by_zero("cpmm reserves"));
    }
    if amount_out as u128 >= reserve_out as u128 {
        return Err(ArbError::out_of_range("amount_out", amount_out, 0u64, reserve_out - 1));
    }
    let numerator = safe_mul_u128(reserve_in as u128, amount_out as u128)?;
    let denominator = safe_sub_u128(reserve_out as u128, amount_out as u128)?;
    // ceil-divide to guarantee the forward quote at this input is >= amount_out
    let in_after_fee = (numerator + denominator - 1) / denominator;
    let fee_complement = (10_000 - fee_bps.min(10_000)) as u128;
    let input = (safe_mul_u128(in_after_fee, 10_000)? + fee_complement - 1) / fee_complement;
    u128_to_u64(input, "cpmm amount_in")
}

fn u128_to_u64(value: u128, field: &str) -> ArbResult<u64> {
    if value > u64::MAX as u128 {
        return Err(ArbError::math_overflow(field));
    }
    Ok(value as u64)
}

/// PumpSwap's effective total fee: LP fee plus protocol fee, plus an
/// optional creator fee when the pool has one configured.
pub fn pumpswap_fee_bps(lp_fee_bps: u32, protocol_fee_bps: u32, creator_fee_bps: u32) -> u32 {
    lp_fee_bps + protocol_fee_bps + creator_fee_bps
}

/// RaydiumV4's fee is expressed as a numerator/denominator pair rather than
/// flat basis points.
pub fn raydium_v4_fee_bps(swap_fee_numerator: u64, swap_fee_denominator: u64) -> ArbResult<u32> {
    if swap_fee_denominator == 0 {
        return Err(ArbError::division_by_zero("raydium v4 fee denominator"));
    }
    let bps = (swap_fee_numerator as u128 * 10_000) / swap_fee_denominator as u128;
    Ok(bps.min(10_000) as u32)
}

/// Effective reserve after subtracting the venue's unrealized PnL accrual
/// from the raw vault balance. Saturates at zero rather than underflowing:
/// a stale accrual snapshot should never produce a negative reserve.
pub fn effective_reserve(vault_balance: u64, pnl_accrual: u64) -> u64 {
    vault_balance.saturating_sub(pnl_accrual)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn amount_out_is_monotone_and_bounded(
            reserve_in in 1_000u64..10_000_000_000,
            reserve_out in 1_000u64..10_000_000_000,
            fee_bps in 0u32..9_999,
            a in 1u64..1_000_000_000,
            b in 1u64..1_000_000_000,
        ) {
            let (small, big) = if a <= b { (a, b) } else { (b, a) };
            let out_small = get_amount_out(small, reserve_in, reserve_out, fee_bps).unwrap();
            let out_big = get_amount_out(big, reserve_in, reserve_out, fee_bps).unwrap();
            prop_assert!(out_small <= out_big);
            prop_assert!(out_big < reserve_out);
        }

        #[test]
        fn zero_fee_round_trip_is_within_one_unit(
            reserve_in in 10_000u64..10_000_000_000,
            reserve_out in 10_000u64..10_000_000_000,
            input in 1u64..1_000_000,
        ) {
            let out = get_amount_out(input, reserve_in, reserve_out, 0).unwrap();
            prop_assume!(out > 0);
            let recovered_in = get_amount_in(out, reserve_in, reserve_out, 0).unwrap();
            prop_assert!(recovered_in <= input + 1);
        }
    }
}
