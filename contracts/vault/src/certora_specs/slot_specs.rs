// ============================================================================
// STRATEGY SLOT SPECIFICATIONS
// ============================================================================
//
// KEY INVARIANTS:
// 1. An announced strategy cannot be committed before its delay
// 2. Once the delay has passed the announced strategy commits
//
// ============================================================================

use crate::slot;
use cvlr::asserts::{cvlr_assert, cvlr_assume};
use cvlr_soroban_derive::rule;
use soroban_sdk::{Address, Env};
use yield_types::{StrategySlot, YieldError};

/// RULE: Commit before `announce + delay` fails with TooEarly
#[rule]
pub fn commit_waits_for_delay(env: Env, next: Address, announced_at: u64, delay: u64, now: u64) {
    let _ = env;
    cvlr_assume!(announced_at.checked_add(delay).is_some());
    cvlr_assume!(now < announced_at + delay);
    let pending = slot::announce(&StrategySlot::Empty, next.clone(), announced_at, delay);
    cvlr_assume!(pending.is_ok());
    if let Ok(pending) = pending {
        cvlr_assert!(slot::commit(&pending, &next, now) == Err(YieldError::TooEarly));
    }
}

/// RULE: Commit at or after `announce + delay` succeeds
#[rule]
pub fn commit_after_delay(env: Env, next: Address, announced_at: u64, delay: u64, now: u64) {
    let _ = env;
    cvlr_assume!(announced_at.checked_add(delay).is_some());
    cvlr_assume!(now >= announced_at + delay);
    if let Ok(pending) = slot::announce(&StrategySlot::Empty, next.clone(), announced_at, delay) {
        cvlr_assert!(slot::commit(&pending, &next, now).is_ok());
    }
}
