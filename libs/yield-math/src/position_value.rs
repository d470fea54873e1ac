//! Valuation of a concentrated-liquidity position.
//!
//! Pure functions over `(sqrt_price, tick_lower, tick_upper, liquidity)`.
//! Every product runs through the 256-bit `mul_div` helpers and every
//! division rounds down, so valuations never overstate a position.

use crate::full_math::mul_div;
use crate::liquidity_math::get_amounts_for_liquidity;
use crate::tick_math::{floor_to_spacing, get_sqrt_ratio_at_tick, usable_tick_bounds};
use soroban_sdk::Env;
use yield_types::{YieldError, MAX_TICK, MIN_TICK, Q96, WEIGHT_SCALE};

/// Liquidity used to derive the token split of a range independent of size
const REFERENCE_LIQUIDITY: u128 = 1_000_000_000_000_000_000;

/// A position is in range while `tick_lower <= tick <= tick_upper`
pub fn in_range(tick: i32, tick_lower: i32, tick_upper: i32) -> bool {
    tick >= tick_lower && tick <= tick_upper
}

pub fn needs_rebalance(tick: i32, tick_lower: i32, tick_upper: i32) -> bool {
    !in_range(tick, tick_lower, tick_upper)
}

pub fn check_ticks(tick_lower: i32, tick_upper: i32) -> Result<(), YieldError> {
    if tick_lower >= tick_upper || tick_lower < MIN_TICK || tick_upper > MAX_TICK {
        return Err(YieldError::OutOfRange);
    }
    Ok(())
}

/// Token amounts held by `liquidity` in `[tick_lower, tick_upper]`
pub fn token_amounts(
    env: &Env,
    sqrt_price_x96: u128,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> (u128, u128) {
    if liquidity == 0 {
        return (0, 0);
    }
    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);
    get_amounts_for_liquidity(env, sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity)
}

/// amount0 expressed in token1 at price `(sqrt_price / Q96)^2`
pub fn token0_in_token1(env: &Env, amount0: u128, sqrt_price_x96: u128) -> u128 {
    let partial = mul_div(env, amount0, sqrt_price_x96, Q96);
    mul_div(env, partial, sqrt_price_x96, Q96)
}

/// amount1 expressed in token0
pub fn token1_in_token0(env: &Env, amount1: u128, sqrt_price_x96: u128) -> u128 {
    let partial = mul_div(env, amount1, Q96, sqrt_price_x96);
    mul_div(env, partial, Q96, sqrt_price_x96)
}

pub fn value_in_token0(env: &Env, amount0: u128, amount1: u128, sqrt_price_x96: u128) -> u128 {
    amount0 + token1_in_token0(env, amount1, sqrt_price_x96)
}

pub fn value_in_token1(env: &Env, amount0: u128, amount1: u128, sqrt_price_x96: u128) -> u128 {
    token0_in_token1(env, amount0, sqrt_price_x96) + amount1
}

/// Share of value held in each token, scaled by `WEIGHT_SCALE`.
///
/// Both weights round down, so they sum to at most `WEIGHT_SCALE`.
/// An empty position reports `(0, 0)`.
pub fn token_weights(env: &Env, amount0: u128, amount1: u128, sqrt_price_x96: u128) -> (u128, u128) {
    let value0 = token0_in_token1(env, amount0, sqrt_price_x96);
    let total = value0 + amount1;
    if total == 0 {
        return (0, 0);
    }
    (
        mul_div(env, value0, WEIGHT_SCALE, total),
        mul_div(env, amount1, WEIGHT_SCALE, total),
    )
}

/// Weights a fresh deposit into `[tick_lower, tick_upper]` must match
pub fn target_weights(env: &Env, sqrt_price_x96: u128, tick_lower: i32, tick_upper: i32) -> (u128, u128) {
    let (amount0, amount1) =
        token_amounts(env, sqrt_price_x96, tick_lower, tick_upper, REFERENCE_LIQUIDITY);
    token_weights(env, amount0, amount1, sqrt_price_x96)
}

/// Range of roughly `target_width` ticks centred on `tick`, aligned to `tick_spacing`.
///
/// The range always contains `tick`: it spans the spacing-aligned bucket of
/// `tick` widened by `target_width / 2` (rounded down to whole spacings) on
/// each side, then clamped to the usable tick bounds.
pub fn centered_range(tick: i32, target_width: u32, tick_spacing: i32) -> Result<(i32, i32), YieldError> {
    if tick_spacing <= 0 || target_width == 0 {
        return Err(YieldError::InvalidConfig);
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(YieldError::OutOfRange);
    }

    let base = floor_to_spacing(tick, tick_spacing);
    let half_width = ((target_width / 2) as i64 / tick_spacing as i64) * tick_spacing as i64;

    let (min_usable, max_usable) = usable_tick_bounds(tick_spacing);
    let lower = (base as i64 - half_width).max(min_usable as i64) as i32;
    let upper = (base as i64 + tick_spacing as i64 + half_width).min(max_usable as i64) as i32;

    check_ticks(lower, upper)?;
    Ok((lower, upper))
}
