// ============================================================================
// INVARIANTS MODULE - Share accounting
// ============================================================================
//
// Predicates over the vault's share accounting. The contract checks them
// with `debug_assert!` (active in the release-with-logs profile) and the
// Certora rules in `certora_specs` prove them for arbitrary inputs.
//
// INVARIANT CATEGORIES:
//
// 1. PRICE INVARIANTS
//    - A deposit or redemption never lowers the share price
//
// 2. ROUNDING INVARIANTS
//    - Minted shares never claim more than was deposited
//    - A redemption never pays more than the shares' proportional claim
//
// 3. CONFIGURATION INVARIANTS
//    - The invest fraction is a proper fraction
//
// ============================================================================

use soroban_sdk::Env;
use yield_math::{price_per_full_share, shares_for_deposit, underlying_for_shares};
use yield_types::InvestRatio;

// ============================================================================
// PRICE INVARIANTS
// ============================================================================

/// Invariant: depositing `amount` does not lower the share price
///
/// Property:
///   pps(supply + minted, total + amount) >= pps(supply, total)
pub fn deposit_keeps_price(env: &Env, unit: i128, amount: i128, total_supply: i128, total_underlying: i128) -> bool {
    if total_supply > 0 && total_underlying <= 0 {
        return true;
    }
    let before = price_per_full_share(env, unit, total_supply, total_underlying);
    let minted = shares_for_deposit(env, amount, total_supply, total_underlying);
    let after = price_per_full_share(env, unit, total_supply + minted, total_underlying + amount);
    after >= before
}

/// Invariant: redeeming `shares` does not lower the share price
///
/// Property:
///   pps(supply - shares, total - claim) >= pps(supply, total)
pub fn redeem_keeps_price(env: &Env, unit: i128, shares: i128, total_supply: i128, total_underlying: i128) -> bool {
    if shares >= total_supply {
        return true;
    }
    let before = price_per_full_share(env, unit, total_supply, total_underlying);
    let claim = underlying_for_shares(env, shares, total_supply, total_underlying);
    let after = price_per_full_share(env, unit, total_supply - shares, total_underlying - claim);
    after >= before
}

/// Invariant: share price never decreases across a loss-free harvest
pub fn price_non_decreasing(before: i128, after: i128) -> bool {
    after >= before
}

// ============================================================================
// ROUNDING INVARIANTS
// ============================================================================

/// Invariant: the minted shares are worth at most the deposit
///
/// Property:
///   underlying_for_shares(minted) <= amount
pub fn deposit_not_overcredited(env: &Env, amount: i128, total_supply: i128, total_underlying: i128) -> bool {
    if total_supply == 0 {
        return true;
    }
    let minted = shares_for_deposit(env, amount, total_supply, total_underlying);
    underlying_for_shares(env, minted, total_supply + minted, total_underlying + amount) <= amount
}

/// Invariant: a redemption pays at most its proportional claim
///
/// Property:
///   claim * supply <= shares * total
///
/// Inputs are bounded to 64 bits so both products fit in i128.
pub fn claim_bounded(claim: i128, shares: i128, total_supply: i128, total_underlying: i128) -> bool {
    claim * total_supply <= shares * total_underlying
}

// ============================================================================
// CONFIGURATION INVARIANTS
// ============================================================================

/// Invariant: 0 <= numerator <= denominator, denominator > 0
pub fn ratio_valid(ratio: &InvestRatio) -> bool {
    ratio.denominator > 0 && ratio.numerator <= ratio.denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: i128 = 10_000_000;

    #[test]
    fn test_price_invariants_hold_after_yield() {
        let env = Env::default();
        // 1000 shares backed by 1100 underlying
        let supply = 1_000 * UNIT;
        let total = 1_100 * UNIT;

        assert!(deposit_keeps_price(&env, UNIT, 1_100 * UNIT, supply, total));
        assert!(deposit_keeps_price(&env, UNIT, 7, supply, total));
        assert!(redeem_keeps_price(&env, UNIT, 333 * UNIT + 1, supply, total));
        assert!(deposit_not_overcredited(&env, 12_345, supply, total));
    }

    #[test]
    fn test_claim_bounded() {
        let env = Env::default();
        let claim = underlying_for_shares(&env, 3, 7, 10);
        assert_eq!(claim, 4);
        assert!(claim_bounded(claim, 3, 7, 10));
        assert!(!claim_bounded(5, 3, 7, 10));
    }

    #[test]
    fn test_ratio_valid() {
        assert!(ratio_valid(&InvestRatio::full()));
        assert!(!ratio_valid(&InvestRatio {
            numerator: 2,
            denominator: 1
        }));
    }
}
