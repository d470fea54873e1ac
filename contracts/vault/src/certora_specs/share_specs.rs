// ============================================================================
// SHARE ACCOUNTING SPECIFICATIONS
// ============================================================================
//
// KEY INVARIANTS:
// 1. The first deposit mints shares 1:1
// 2. Deposits and redemptions never lower the share price
// 3. Rounding always stays in the vault
//
// ============================================================================

use crate::invariants;
use cvlr::asserts::{cvlr_assert, cvlr_assume, cvlr_satisfy};
use cvlr_soroban_derive::rule;
use soroban_sdk::Env;
use yield_math::{shares_for_deposit, underlying_for_shares};

/// RULE: Sanity - a deposit into a funded vault is reachable
#[rule]
pub fn sanity_deposit(env: Env, amount: i128, supply: i128, total: i128) {
    cvlr_assume!(amount > 0 && supply > 0 && total > 0);
    let _shares = shares_for_deposit(&env, amount, supply, total);
    cvlr_satisfy!(true);
}

/// RULE: First deposit is 1:1
#[rule]
pub fn first_deposit_one_to_one(env: Env, amount: i128) {
    cvlr_assume!(amount > 0);
    cvlr_assert!(shares_for_deposit(&env, amount, 0, 0) == amount);
}

/// RULE: Deposits never lower the share price
#[rule]
pub fn deposit_keeps_price(env: Env, unit: i128, amount: i128, supply: i128, total: i128) {
    cvlr_assume!(unit > 0 && amount > 0);
    cvlr_assume!(supply > 0 && total > 0);
    cvlr_assume!(amount < i64::MAX as i128 && supply < i64::MAX as i128 && total < i64::MAX as i128);
    cvlr_assert!(invariants::deposit_keeps_price(&env, unit, amount, supply, total));
}

/// RULE: Redemptions never lower the share price
#[rule]
pub fn redeem_keeps_price(env: Env, unit: i128, shares: i128, supply: i128, total: i128) {
    cvlr_assume!(unit > 0 && shares > 0 && shares < supply);
    cvlr_assume!(total > 0 && supply < i64::MAX as i128 && total < i64::MAX as i128);
    cvlr_assert!(invariants::redeem_keeps_price(&env, unit, shares, supply, total));
}

/// RULE: A redemption pays at most its proportional claim
#[rule]
pub fn redeem_rounds_down(env: Env, shares: i128, supply: i128, total: i128) {
    cvlr_assume!(shares > 0 && shares <= supply);
    cvlr_assume!(total >= 0 && supply < i64::MAX as i128 && total < i64::MAX as i128);
    let claim = underlying_for_shares(&env, shares, supply, total);
    cvlr_assert!(invariants::claim_bounded(claim, shares, supply, total));
}
