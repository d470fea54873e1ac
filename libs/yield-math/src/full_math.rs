use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));

    u128_from_u256(env, &result)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let result = mul_div(env, a, b, denominator);

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let remainder = product.rem_euclid(&U256::from_u128(env, denominator));

    if remainder.gt(&U256::from_u32(env, 0)) {
        result + 1
    } else {
        result
    }
}

/// Convert U256 to u128, panics if overflow
pub fn u128_from_u256(env: &Env, value: &U256) -> u128 {
    if value.gt(&U256::from_u128(env, u128::MAX)) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap_or(u128::MAX)
}

/// Saturating conversion between the unsigned math domain and token amounts
pub fn to_amount(value: u128) -> i128 {
    if value > i128::MAX as u128 {
        i128::MAX
    } else {
        value as i128
    }
}

/// Negative token amounts are treated as zero by the valuation math
pub fn from_amount(value: i128) -> u128 {
    if value < 0 {
        0
    } else {
        value as u128
    }
}
