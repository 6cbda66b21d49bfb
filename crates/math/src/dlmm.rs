//! Discrete-bin (DLMM) fixed-point primitives: per-bin price, dynamic fee,
//! and the single-bin swap step. The multi-bin walk lives in `arb-sim`.

use crate::safe::safe_mul_div_q64_round_up;
use arb_types::{ArbError, ArbResult, DLMM_FEE_PRECISION, DLMM_MAX_FEE_RATE_1E9, MAX_ACTIVE_ID_MAGNITUDE, MAX_BIN_STEP, Q64};
use ethnum::U256;

fn validate_bin_id(bin_id: i32) -> ArbResult<()> {
    if bin_id.unsigned_abs() as i32 > MAX_ACTIVE_ID_MAGNITUDE {
        return Err(ArbError::out_of_range("bin_id", bin_id, -MAX_ACTIVE_ID_MAGNITUDE, MAX_ACTIVE_ID_MAGNITUDE));
    }
    Ok(())
}

fn validate_bin_step(bin_step: u16) -> ArbResult<()> {
    if bin_step == 0 || bin_step > MAX_BIN_STEP {
        return Err(ArbError::out_of_range("bin_step", bin_step, 1u16, MAX_BIN_STEP));
    }
    Ok(())
}

/// `(1 + bin_step/10_000)^bin_id` in Q64.64, via exponentiation-by-squaring.
/// Negative `bin_id` inverts the positive result at Q128 precision.
pub fn price_q64(bin_id: i32, bin_step: u16) -> ArbResult<u128> {
    validate_bin_id(bin_id)?;
    validate_bin_step(bin_step)?;

    let base: U256 = U256::from(Q64) + (U256::from(Q64) * U256::from(bin_step) / U256::from(10_000u32));
    let exponent = bin_id.unsigned_abs();

    let mut result = U256::from(Q64);
    let mut acc = base;
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 {
            result = (result * acc) >> 64u32;
        }
        acc = (acc * acc) >> 64u32;
        e >>= 1;
    }

    let price = if bin_id < 0 {
        if result == U256::ZERO {
            return Err(ArbError::division_by_zero("dlmm price_q64 inversion"));
        }
        (U256::from(Q64) * U256::from(Q64)) / result
    } else {
        result
    };

    if price > U256::from(u128::MAX) {
        return Err(ArbError::math_overflow("dlmm price_q64"));
    }
    Ok(price.as_u128())
}

/// Integer binary search symmetric to `sqrt_price_q64_to_tick`.
pub fn bin_id_from_price_q64(price: u128, bin_step: u16) -> ArbResult<i32> {
    validate_bin_step(bin_step)?;
    let mut lo = -MAX_ACTIVE_ID_MAGNITUDE;
    let mut hi = MAX_ACTIVE_ID_MAGNITUDE;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if price_q64(mid, bin_step)? <= price {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// `index = floor(bin_id / 70)`, `offset = bin_id mod 70` (Euclidean remainder,
/// always non-negative).
pub fn bin_array_index_and_offset(bin_id: i32, bins_per_array: i32) -> (i64, usize) {
    let index = (bin_id as i64).div_euclid(bins_per_array as i64);
    let offset = bin_id.rem_euclid(bins_per_array) as usize;
    (index, offset)
}

/// Swap X for Y within a single bin. Returns `(output_y, input_x_consumed)`;
/// when the bin's `amount_y` is exhausted, the consumed input is back-solved
/// from the clipped output rather than the full requested input.
pub fn swap_for_y(input_x: u128, price_q64: u128, amount_y_in_bin: u128) -> ArbResult<(u128, u128)> {
    let full_output = safe_mul_div_q64_round_up(input_x, price_q64)
        .unwrap_or_else(|_| ((U256::from(input_x) * U256::from(price_q64)) >> 64u32).as_u128());
    if full_output <= amount_y_in_bin {
        Ok((full_output, input_x))
    } else {
        let consumed = (U256::from(amount_y_in_bin) << 64u32) / U256::from(price_q64);
        Ok((amount_y_in_bin, consumed.as_u128().min(input_x)))
    }
}

/// Swap Y for X within a single bin, the inverse of [`swap_for_y`].
pub fn swap_for_x(input_y: u128, price_q64: u128, amount_x_in_bin: u128) -> ArbResult<(u128, u128)> {
    if price_q64 == 0 {
        return Err(ArbError::division_by_zero("dlmm swap_for_x price"));
    }
    let full_output = (U256::from(input_y) << 64u32) / U256::from(price_q64);
    if full_output <= U256::from(amount_x_in_bin) {
        Ok((full_output.as_u128(), input_y))
    } else {
        let consumed = (U256::from(amount_x_in_bin) * U256::from(price_q64)) >> 64u32;
        Ok((amount_x_in_bin, consumed.as_u128().min(input_y)))
    }
}

/// Dynamic fee rate at 1e9 precision: `base_fee_rate + variable_fee_rate`,
/// capped at `DLMM_MAX_FEE_RATE_1E9` (10%).
pub fn dynamic_fee_rate_1e9(
    base_factor: u16,
    bin_step: u16,
    base_fee_power_factor: u8,
    variable_fee_control: u32,
    volatility_accumulator: u32,
    max_volatility_accumulator: u32,
) -> u64 {
    let base_fee_rate = (base_factor as u64)
        .saturating_mul(bin_step as u64)
        .saturating_mul(10)
        .saturating_mul(10u64.saturating_pow(base_fee_power_factor as u32))
        .min(DLMM_MAX_FEE_RATE_1E9);

    let volatility = volatility_accumulator.min(max_volatility_accumulator) as u64;
    let scaled = volatility.saturating_mul(bin_step as u64);
    let squared = scaled.saturating_mul(scaled);
    let variable_fee_rate = (variable_fee_control as u64).saturating_mul(squared) / 100_000_000_000u64;

    (base_fee_rate + variable_fee_rate).min(DLMM_MAX_FEE_RATE_1E9)
}

/// Deducts the dynamic fee from an exact input amount, returning
/// `(amount_after_fee, fee_paid)`.
pub fn apply_dynamic_fee(input: u128, fee_rate_1e9: u64) -> (u128, u128) {
    let fee = (input * fee_rate_1e9 as u128) / DLMM_FEE_PRECISION as u128;
    (input.saturating_sub(fee), fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_zero_is_unit_price() {
        assert_eq!(price_q64(0, 10).unwrap(), Q64);
    }

    #[test]
    fn price_increases_with_bin_id() {
        let p_neg = price_q64(-100, 10).unwrap();
        let p_zero = price_q64(0, 10).unwrap();
        let p_pos = price_q64(100, 10).unwrap();
        assert!(p_neg < p_zero);
        assert!(p_zero < p_pos);
    }

    #[test]
    fn bin_array_indexing_handles_negative_ids() {
        assert_eq!(bin_array_index_and_offset(0, 70), (0, 0));
        assert_eq!(bin_array_index_and_offset(69, 70), (0, 69));
        assert_eq!(bin_array_index_and_offset(70, 70), (1, 0));
        assert_eq!(bin_array_index_and_offset(-1, 70), (-1, 69));
        assert_eq!(bin_array_index_and_offset(-70, 70), (-1, 0));
        assert_eq!(bin_array_index_and_offset(-71, 70), (-2, 69));
    }

    #[test]
    fn swap_for_y_clips_to_bin_liquidity() {
        let price = Q64 * 2; // 2.0
        let (out, consumed) = swap_for_y(1_000, price, 500).unwrap();
        assert_eq!(out, 500);
        assert!(consumed <= 1_000);
    }

    #[test]
    fn dynamic_fee_is_capped() {
        let fee = dynamic_fee_rate_1e9(u16::MAX, u16::MAX, 5, u32::MAX, u32::MAX, u32::MAX);
        assert!(fee <= DLMM_MAX_FEE_RATE_1E9);
    }

    #[test]
    fn apply_dynamic_fee_reduces_input() {
        let (after_fee, fee) = apply_dynamic_fee(1_000_000, 1_000_000); // 0.1%
        assert_eq!(fee, 1_000);
        assert_eq!(after_fee, 999_000);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn zero_bin_is_always_unit_price(bin_step in 1u16..=500) {
            prop_assert_eq!(price_q64(0, bin_step).unwrap(), Q64);
        }

        #[test]
        fn opposing_bins_invert_within_epsilon(n in 1i32..20_000, bin_step in 1u16..=500) {
            let up = price_q64(n, bin_step).unwrap();
            let down = price_q64(-n, bin_step).unwrap();
            let product = U256::from(up) * U256::from(down);
            let target = U256::from(Q64) * U256::from(Q64);
            let epsilon = target / U256::from(1_000_000u32); // 1 ppm rounding slack
            let diff = if product > target { product - target } else { target - product };
            prop_assert!(diff <= epsilon);
        }
    }
}
