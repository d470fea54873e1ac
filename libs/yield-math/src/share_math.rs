//! Vault share accounting.
//!
//! Shares are minted against the pre-deposit totals and redeemed against
//! the pre-burn totals. Both directions round down, so rounding always
//! stays in the vault and never favours the depositor or the redeemer.

use soroban_fixed_point_math::SorobanFixedPoint;
use soroban_sdk::Env;
use yield_types::BPS_DENOMINATOR;

/// 10^decimals, the share price reported for a 1:1 vault
pub fn underlying_unit(decimals: u32) -> i128 {
    10i128.pow(decimals)
}

/// Shares minted for `amount`; 1:1 while the vault has no shares
pub fn shares_for_deposit(env: &Env, amount: i128, total_supply: i128, total_underlying: i128) -> i128 {
    if total_supply == 0 {
        return amount;
    }
    if total_underlying <= 0 {
        panic!("Division by zero");
    }
    amount.fixed_mul_floor(env, &total_supply, &total_underlying)
}

/// Underlying owed for redeeming `shares`
pub fn underlying_for_shares(env: &Env, shares: i128, total_supply: i128, total_underlying: i128) -> i128 {
    if total_supply <= 0 {
        panic!("Division by zero");
    }
    total_underlying.fixed_mul_floor(env, &shares, &total_supply)
}

/// Underlying backing one full share (`unit` precision)
pub fn price_per_full_share(env: &Env, unit: i128, total_supply: i128, total_underlying: i128) -> i128 {
    if total_supply == 0 {
        return unit;
    }
    unit.fixed_mul_floor(env, &total_underlying, &total_supply)
}

/// Amount the vault should push to its strategy so that
/// `numerator / denominator` of all holdings end up invested.
/// Never exceeds what is idle in the vault.
pub fn available_to_invest(
    env: &Env,
    total_underlying: i128,
    invested: i128,
    in_vault: i128,
    numerator: u32,
    denominator: u32,
) -> i128 {
    if denominator == 0 {
        panic!("Division by zero");
    }
    let wanted = total_underlying.fixed_mul_floor(env, &(numerator as i128), &(denominator as i128));
    if invested >= wanted {
        return 0;
    }
    (wanted - invested).min(in_vault.max(0))
}

/// `bps / 10_000` of `amount`, rounded down
pub fn bps_of(env: &Env, amount: i128, bps: u32) -> i128 {
    amount.fixed_mul_floor(env, &(bps as i128), &(BPS_DENOMINATOR as i128))
}
