use crate::full_math::{mul_div, u128_from_u256};
use soroban_sdk::{Env, U256};
use yield_types::Q96;

fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Largest liquidity that `amount0`/`amount1` can fund in `[sqrt_a, sqrt_b]`
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        get_liquidity_for_amount0(env, lower, upper, amount0)
    } else if sqrt_ratio_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(env, sqrt_ratio_x96, upper, amount0);
        let liquidity1 = get_liquidity_for_amount1(env, lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        get_liquidity_for_amount1(env, lower, upper, amount1)
    }
}

/// L = amount0 * sqrt_a * sqrt_b / (sqrt_b - sqrt_a)
fn get_liquidity_for_amount0(env: &Env, lower: u128, upper: u128, amount0: u128) -> u128 {
    let intermediate = mul_div(env, lower, upper, Q96);
    mul_div(env, amount0, intermediate, upper - lower)
}

/// L = amount1 / (sqrt_b - sqrt_a)
fn get_liquidity_for_amount1(env: &Env, lower: u128, upper: u128, amount1: u128) -> u128 {
    mul_div(env, amount1, Q96, upper - lower)
}

/// Token amounts represented by `liquidity` in `[sqrt_a, sqrt_b]` at `sqrt_ratio_x96`.
///
/// Below (or at) the lower bound the position is entirely token0, at or
/// above the upper bound entirely token1.
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> (u128, u128) {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        (get_amount0_for_liquidity(env, lower, upper, liquidity), 0)
    } else if sqrt_ratio_x96 < upper {
        (
            get_amount0_for_liquidity(env, sqrt_ratio_x96, upper, liquidity),
            get_amount1_for_liquidity(env, lower, sqrt_ratio_x96, liquidity),
        )
    } else {
        (0, get_amount1_for_liquidity(env, lower, upper, liquidity))
    }
}

/// amount0 = L * Q96 * (sqrt_b - sqrt_a) / sqrt_b / sqrt_a
///
/// `L << 96` does not fit in u128, so the whole chain stays in U256.
fn get_amount0_for_liquidity(env: &Env, lower: u128, upper: u128, liquidity: u128) -> u128 {
    if lower == 0 {
        panic!("Division by zero");
    }
    let scaled = U256::from_u128(env, liquidity)
        .mul(&U256::from_u128(env, Q96))
        .div(&U256::from_u128(env, lower));
    let amount = scaled
        .mul(&U256::from_u128(env, upper - lower))
        .div(&U256::from_u128(env, upper));
    u128_from_u256(env, &amount)
}

/// amount1 = L * (sqrt_b - sqrt_a) / Q96
fn get_amount1_for_liquidity(env: &Env, lower: u128, upper: u128, liquidity: u128) -> u128 {
    mul_div(env, liquidity, upper - lower, Q96)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_ratio_at_tick;
    use soroban_sdk::Env;

    #[test]
    fn test_liquidity_below_range_uses_only_token0() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, 600);
        let upper = get_sqrt_ratio_at_tick(&env, 1200);

        let only0 = get_liquidity_for_amounts(&env, Q96, lower, upper, 1_000_000, 0);
        let with1 = get_liquidity_for_amounts(&env, Q96, lower, upper, 1_000_000, 5_000_000);
        assert!(only0 > 0);
        assert_eq!(only0, with1);
    }

    #[test]
    fn test_liquidity_above_range_uses_only_token1() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -1200);
        let upper = get_sqrt_ratio_at_tick(&env, -600);

        let only1 = get_liquidity_for_amounts(&env, Q96, lower, upper, 0, 1_000_000);
        let with0 = get_liquidity_for_amounts(&env, Q96, lower, upper, 9_000_000, 1_000_000);
        assert!(only1 > 0);
        assert_eq!(only1, with0);
    }

    #[test]
    fn test_liquidity_in_range_is_limited_by_scarce_side() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -600);
        let upper = get_sqrt_ratio_at_tick(&env, 600);

        let balanced = get_liquidity_for_amounts(&env, Q96, lower, upper, 1_000_000, 1_000_000);
        let short0 = get_liquidity_for_amounts(&env, Q96, lower, upper, 500_000, 1_000_000);
        assert!(short0 < balanced);
    }

    #[test]
    fn test_amounts_at_lower_bound_are_all_token0() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -600);
        let upper = get_sqrt_ratio_at_tick(&env, 600);

        let (amount0, amount1) = get_amounts_for_liquidity(&env, lower, lower, upper, 1u128 << 70);
        assert!(amount0 > 0);
        assert_eq!(amount1, 0);
    }

    #[test]
    fn test_amounts_at_upper_bound_are_all_token1() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -600);
        let upper = get_sqrt_ratio_at_tick(&env, 600);

        let (amount0, amount1) = get_amounts_for_liquidity(&env, upper, lower, upper, 1u128 << 70);
        assert_eq!(amount0, 0);
        assert!(amount1 > 0);
    }

    #[test]
    fn test_large_liquidity_does_not_overflow() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -600);
        let upper = get_sqrt_ratio_at_tick(&env, 600);

        // L << 96 would overflow u128 here
        let liquidity = 1u128 << 64;
        let (amount0, amount1) = get_amounts_for_liquidity(&env, Q96, lower, upper, liquidity);
        assert!(amount0 > 0 && amount1 > 0);
        // symmetric range around price 1 holds roughly equal amounts
        assert!(amount0.abs_diff(amount1) < amount0 / 100);
    }

    #[test]
    fn test_amounts_roundtrip_never_exceeds_deposit() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -1200);
        let upper = get_sqrt_ratio_at_tick(&env, 2400);

        let liquidity =
            get_liquidity_for_amounts(&env, Q96, lower, upper, 10_000_000, 10_000_000);
        let (amount0, amount1) = get_amounts_for_liquidity(&env, Q96, lower, upper, liquidity);
        assert!(amount0 <= 10_000_000);
        assert!(amount1 <= 10_000_000);
    }
}
