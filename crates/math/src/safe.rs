//! Overflow-checked arithmetic. Every operation returns a `Result` instead
//! of panicking or silently wrapping.

use arb_types::{ArbError, ArbResult, Q64};
use ethnum::U256;

pub fn safe_add_u128(a: u128, b: u128) -> ArbResult<u128> {
    a.checked_add(b).ok_or_else(|| ArbError::math_overflow("u128 addition"))
}

pub fn safe_sub_u128(a: u128, b: u128) -> ArbResult<u128> {
    a.checked_sub(b).ok_or_else(|| ArbError::math_overflow("u128 subtraction"))
}

pub fn safe_mul_u128(a: u128, b: u128) -> ArbResult<u128> {
    a.checked_mul(b).ok_or_else(|| ArbError::math_overflow("u128 multiplication"))
}

pub fn safe_div_u128(a: u128, b: u128) -> ArbResult<u128> {
    if b == 0 {
        return Err(ArbError::division_by_zero("u128 division"));
    }
    Ok(a / b)
}

/// `a * b / Q64`, with a 256-bit intermediate so the product never overflows
/// before the division.
pub fn safe_mul_q64(a: u128, b: u128) -> ArbResult<u128> {
    let result = U256::from(a) * U256::from(b) / U256::from(Q64);
    u256_to_u128(result, "Q64 fixed-point multiplication")
}

/// `a * Q64 / b`, with a 256-bit intermediate.
pub fn safe_div_q64(a: u128, b: u128) -> ArbResult<u128> {
    if b == 0 {
        return Err(ArbError::division_by_zero("Q64 fixed-point division"));
    }
    let numerator = U256::from(a) * U256::from(Q64);
    let result = numerator / U256::from(b);
    u256_to_u128(result, "Q64 fixed-point division")
}

/// `a * b / Q64`, rounding the remainder up instead of truncating.
pub fn safe_mul_div_q64_round_up(a: u128, b: u128) -> ArbResult<u128> {
    let numerator = U256::from(a) * U256::from(b);
    let denominator = U256::from(Q64);
    let (quotient, remainder) = (numerator / denominator, numerator % denominator);
    let result = if remainder > U256::ZERO { quotient + U256::ONE } else { quotient };
    u256_to_u128(result, "Q64 fixed-point multiplication (round up)")
}

fn u256_to_u128(value: U256, operation: &str) -> ArbResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(ArbError::math_overflow(operation));
    }
    Ok(value.as_u128())
}

pub fn safe_shl_u128(value: u128, shift: u32) -> ArbResult<u128> {
    if shift >= 128 {
        return Err(ArbError::math_overflow("left shift"));
    }
    value.checked_shl(shift).ok_or_else(|| ArbError::math_overflow("left shift"))
}

pub fn safe_shr_u128(value: u128, shift: u32) -> u128 {
    if shift >= 128 {
        0
    } else {
        value >> shift
    }
}

/// Integer square root via Newton's method on a 256-bit intermediate.
pub fn sqrt_u256(value: U256) -> U256 {
    if value == U256::ZERO {
        return U256::ZERO;
    }
    if value < U256::from(4u32) {
        return U256::ONE;
    }
    let mut x = value;
    let mut y = (value + U256::ONE) / U256::from(2u32);
    while y < x {
        x = y;
        y = (x + value / x) / U256::from(2u32);
    }
    x
}

pub fn safe_sqrt_u128(value: u128) -> u128 {
    sqrt_u256(U256::from(value)).as_u128()
}

/// Change between `old_value` and `new_value`, in basis points, capped at
/// 10_000 (100%). A change from zero is reported as a full 100% move.
pub fn calculate_change_bps(new_value: u128, old_value: u128) -> ArbResult<u64> {
    if old_value == 0 {
        return Ok(10_000);
    }
    let diff = if new_value > old_value {
        safe_sub_u128(new_value, old_value)?
    } else {
        safe_sub_u128(old_value, new_value)?
    };
    let bps = safe_div_u128(safe_mul_u128(diff, 10_000)?, old_value)?;
    Ok(bps.min(10_000) as u64)
}

pub fn validate_bounds_u128(value: u128, min: u128, max: u128, field: &str) -> ArbResult<()> {
    if value < min || value > max {
        return Err(ArbError::out_of_range(field, value, min, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_overflow_cases_error() {
        assert!(safe_add_u128(u128::MAX, 1).is_err());
        assert!(safe_sub_u128(1, 2).is_err());
        assert!(safe_div_u128(1, 0).is_err());
    }

    #[test]
    fn q64_multiplication_identity() {
        assert_eq!(safe_mul_q64(Q64, 2 * Q64).unwrap(), 2 * Q64);
    }

    #[test]
    fn q64_division_identity() {
        assert_eq!(safe_div_q64(4 * Q64, 2 * Q64).unwrap(), 2 * Q64);
        assert!(safe_div_q64(Q64, 0).is_err());
    }

    #[test]
    fn round_up_only_bumps_on_remainder() {
        assert_eq!(safe_mul_div_q64_round_up(Q64, Q64).unwrap(), Q64);
        // 1 * 1 / Q64 truncates to 0 but has a nonzero remainder.
        assert_eq!(safe_mul_div_q64_round_up(1, 1).unwrap(), 1);
    }

    #[test]
    fn sqrt_matches_known_values() {
        assert_eq!(safe_sqrt_u128(0), 0);
        assert_eq!(safe_sqrt_u128(1), 1);
        assert_eq!(safe_sqrt_u128(4), 2);
        assert_eq!(safe_sqrt_u128(9), 3);
        assert_eq!(safe_sqrt_u128(10_000), 100);
    }

    #[test]
    fn change_bps_symmetric_for_up_and_down() {
        assert_eq!(calculate_change_bps(110, 100).unwrap(), 1000);
        assert_eq!(calculate_change_bps(90, 100).unwrap(), 1000);
        assert_eq!(calculate_change_bps(100, 0).unwrap(), 10_000);
    }
}
