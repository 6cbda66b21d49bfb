//! Concentrated-liquidity (Q64.64 sqrt-price) fixed-point primitives.
//!
//! Tick-to-price conversion uses the same 19-entry magic-number table as
//! Uniswap V3's `TickMath`, accumulated at Q128.128 precision in a 256-bit
//! intermediate and shifted down to Q64.64 at the end. The swap loop itself
//! (tick-array traversal, crossing, fee accrual) lives in `arb-sim`, which
//! owns the cache types these primitives don't know about.

use crate::safe::{safe_add_u128, safe_sub_u128};
use arb_types::{ArbError, ArbResult, MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use ethnum::U256;

/// `sqrt(1.0001)^(2^i)` in Q128.128, for i in 0..19. Ported from the
/// standard Uniswap V3 `TickMath.getSqrtRatioAtTick` magic-number table.
const RATIO_TABLE_Q128: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cf0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

fn validate_tick(tick: i32) -> ArbResult<()> {
    if tick < MIN_TICK || tick > MAX_TICK {
        return Err(ArbError::out_of_range("tick", tick, MIN_TICK, MAX_TICK));
    }
    Ok(())
}

/// Binary decomposition of `|tick|` over the magic-number table, inverted
/// for negative ticks.
pub fn tick_to_sqrt_price_q64(tick: i32) -> ArbResult<u128> {
    validate_tick(tick)?;

    let abs_tick = tick.unsigned_abs();
    let mut ratio: U256 = if abs_tick & 0x1 != 0 {
        U256::from(RATIO_TABLE_Q128[0])
    } else {
        U256::from(1u8) << 128u32
    };

    for (i, entry) in RATIO_TABLE_Q128.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << i) != 0 {
            ratio = (ratio * U256::from(*entry)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = (U256::from(1u8) << 255u32) / ratio * U256::from(2u8);
    }

    // Q128.128 -> Q64.64, rounding up so round-trips never undershoot.
    let rounding = if ratio & U256::from((1u128 << 64) - 1) != U256::ZERO { 1u128 } else { 0u128 };
    let sqrt_price: u128 = (ratio >> 64u32).as_u128() + rounding;

    Ok(sqrt_price.clamp(MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64))
}

/// Integer binary search so that `tick_to_sqrt_price_q64(t) <= p < tick_to_sqrt_price_q64(t+1)`.
pub fn sqrt_price_q64_to_tick(sqrt_price_q64: u128) -> ArbResult<i32> {
    if sqrt_price_q64 < MIN_SQRT_PRICE_X64 || sqrt_price_q64 > MAX_SQRT_PRICE_X64 {
        return Err(ArbError::out_of_range(
            "sqrt_price_q64",
            sqrt_price_q64,
            MIN_SQRT_PRICE_X64,
            MAX_SQRT_PRICE_X64,
        ));
    }

    let mut lo = MIN_TICK;
    let mut hi = MAX_TICK;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if tick_to_sqrt_price_q64(mid)? <= sqrt_price_q64 {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// `ceil_or_floor( L * (pU - pL) * 2^64 / (pL * pU) )`, the amount of token0
/// locked between two sqrt-prices for liquidity `liquidity`.
pub fn amount0_delta(sqrt_price_lower: u128, sqrt_price_upper: u128, liquidity: u128, round_up: bool) -> ArbResult<u128> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(ArbError::out_of_range("sqrt_price_lower", sqrt_price_lower, 0u128, sqrt_price_upper));
    }
    let diff = safe_sub_u128(sqrt_price_upper, sqrt_price_lower)?;
    let numerator = U256::from(liquidity) * U256::from(diff) << 64u32;
    let denominator = U256::from(sqrt_price_lower) * U256::from(sqrt_price_upper);
    let (q, r) = (numerator / denominator, numerator % denominator);
    let result: U256 = if round_up && r > U256::ZERO { q + U256::ONE } else { q };
    if result > U256::from(u128::MAX) {
        return Err(ArbError::math_overflow("clmm amount0_delta"));
    }
    Ok(result.as_u128())
}

/// `ceil_or_floor( L * (pU - pL) / 2^64 )`, the amount of token1.
pub fn amount1_delta(sqrt_price_lower: u128, sqrt_price_upper: u128, liquidity: u128, round_up: bool) -> ArbResult<u128> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(ArbError::out_of_range("sqrt_price_lower", sqrt_price_lower, 0u128, sqrt_price_upper));
    }
    let diff = safe_sub_u128(sqrt_price_upper, sqrt_price_lower)?;
    let numerator = U256::from(liquidity) * U256::from(diff);
    let denominator = U256::from(1u128) << 64u32;
    let (q, r) = (numerator / denominator, numerator % denominator);
    let result: U256 = if round_up && r > U256::ZERO { q + U256::ONE } else { q };
    if result > U256::from(u128::MAX) {
        return Err(ArbError::math_overflow("clmm amount1_delta"));
    }
    Ok(result.as_u128())
}

/// Next sqrt-price after supplying `amount` of token0 as exact input.
/// `zero_for_one` swaps are price-decreasing, so the price always moves down.
pub fn next_sqrt_price_from_amount0(sqrt_price: u128, liquidity: u128, amount: u128) -> ArbResult<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    let numerator1 = U256::from(liquidity) << 64u32;
    let product = U256::from(amount) * U256::from(sqrt_price);
    let denominator = numerator1 + product;
    let result: U256 = (numerator1 * U256::from(sqrt_price) + denominator - U256::ONE) / denominator;
    if result == U256::ZERO {
        return Err(ArbError::out_of_range("clmm next_sqrt_price_from_amount0", "0", "1", "u128::MAX"));
    }
    Ok(result.as_u128())
}

/// Next sqrt-price after supplying `amount` of token1 as exact input.
/// `one_for_zero` swaps are price-increasing.
pub fn next_sqrt_price_from_amount1(sqrt_price: u128, liquidity: u128, amount: u128) -> ArbResult<u128> {
    let quotient = (U256::from(amount) << 64u32) / U256::from(liquidity);
    let next: U256 = U256::from(sqrt_price) + quotient;
    if next > U256::from(u128::MAX) {
        return Err(ArbError::math_overflow("clmm next_sqrt_price_from_amount1"));
    }
    Ok(next.as_u128())
}

pub fn next_sqrt_price_from_input(sqrt_price: u128, liquidity: u128, amount_in: u128, zero_for_one: bool) -> ArbResult<u128> {
    if zero_for_one {
        next_sqrt_price_from_amount0(sqrt_price, liquidity, amount_in)
    } else {
        next_sqrt_price_from_amount1(sqrt_price, liquidity, amount_in)
    }
}

/// The `TickArray` start index covering `tick` for the given `tick_spacing`:
/// the multiple of `60 * tick_spacing` that `tick` falls within, rounding
/// toward negative infinity.
pub fn tick_array_start_index(tick: i32, tick_spacing: u16) -> i32 {
    let span = 60i64 * tick_spacing as i64;
    let t = tick as i64;
    let start = t.div_euclid(span) * span;
    start as i32
}

/// Add liquidity_net with sign flipped when crossing a tick while moving
/// down in price (token0 in, price decreasing).
pub fn apply_liquidity_net_on_cross(liquidity: u128, liquidity_net: i128, moving_down: bool) -> ArbResult<u128> {
    let net = if moving_down { -liquidity_net } else { liquidity_net };
    if net >= 0 {
        safe_add_u128(liquidity, net as u128)
    } else {
        safe_sub_u128(liquidity, (-net) as u128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_types::Q64;

    #[test]
    fn tick_zero_is_unit_price() {
        assert_eq!(tick_to_sqrt_price_q64(0).unwrap(), Q64);
    }

    #[test]
    fn tick_bounds_are_rejected_outside_range() {
        assert!(tick_to_sqrt_price_q64(MIN_TICK - 1).is_err());
        assert!(tick_to_sqrt_price_q64(MAX_TICK + 1).is_err());
    }

    #[test]
    fn sqrt_price_is_monotonic_in_tick() {
        let p_neg = tick_to_sqrt_price_q64(-1000).unwrap();
        let p_zero = tick_to_sqrt_price_q64(0).unwrap();
        let p_pos = tick_to_sqrt_price_q64(1000).unwrap();
        assert!(p_neg < p_zero);
        assert!(p_zero < p_pos);
    }

    #[test]
    fn round_trip_tick_to_price_to_tick() {
        for tick in [-443636, -10_000, -1, 0, 1, 10_000, 443636] {
            let price = tick_to_sqrt_price_q64(tick).unwrap();
            let recovered = sqrt_price_q64_to_tick(price).unwrap();
            assert_eq!(recovered, tick, "tick {} round-trip failed", tick);
        }
    }

    #[test]
    fn amount_deltas_require_ordered_bounds() {
        let p_lo = tick_to_sqrt_price_q64(-100).unwrap();
        let p_hi = tick_to_sqrt_price_q64(100).unwrap();
        assert!(amount0_delta(p_hi, p_lo, 1_000, false).is_err());
        assert!(amount0_delta(p_lo, p_hi, 1_000, false).is_ok());
    }

    #[test]
    fn amount_deltas_round_up_is_never_smaller() {
        let p_lo = tick_to_sqrt_price_q64(-60).unwrap();
        let p_hi = tick_to_sqrt_price_q64(60).unwrap();
        let floor = amount0_delta(p_lo, p_hi, 1_234_567, false).unwrap();
        let ceil = amount0_delta(p_lo, p_hi, 1_234_567, true).unwrap();
        assert!(ceil >= floor);
    }

    #[test]
    fn tick_array_start_index_is_aligned_and_floors() {
        assert_eq!(tick_array_start_index(0, 1), 0);
        assert_eq!(tick_array_start_index(61, 1), 60);
        assert_eq!(tick_array_start_index(-1, 1), -60);
        assert_eq!(tick_array_start_index(-61, 1), -120);
    }

    #[test]
    fn next_sqrt_price_from_amount0_decreases_price() {
        let p = Q64;
        let next = next_sqrt_price_from_amount0(p, 10u128.pow(18), 1_000).unwrap();
        assert!(next <= p);
    }

    #[test]
    fn next_sqrt_price_from_amount1_increases_price() {
        let p = Q64;
        let next = next_sqrt_price_from_amount1(p, 10u128.pow(18), 1_000).unwrap();
        assert!(next >= p);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tick_brackets_its_own_sqrt_price(tick in (MIN_TICK + 1)..(MAX_TICK - 1)) {
            let price = tick_to_sqrt_price_q64(tick).unwrap();
            let next_price = tick_to_sqrt_price_q64(tick + 1).unwrap();
            prop_assert!(price < next_price);
            let recovered = sqrt_price_q64_to_tick(price).unwrap();
            prop_assert_eq!(recovered, tick);
        }
    }
}
