//! Reward pre-pay feed.
//!
//! An external pre-pay contract reports the cumulative amount of rewards it
//! has prepaid for this strategy. Each harvest reports the delta since the
//! previous harvest exactly once, as an additive adjustment alongside the
//! rewards actually claimed.

use crate::config::BaseKey;
use soroban_sdk::{Address, Env, Symbol};
use yield_types::YieldError;

pub fn prepay_source(env: &Env) -> Option<Address> {
    env.storage().instance().get(&BaseKey::PrepaySource)
}

pub fn set_prepay_source(env: &Env, source: &Address) {
    env.storage().instance().set(&BaseKey::PrepaySource, source);
    env.events()
        .publish((Symbol::new(env, "prepay_source_set"),), source.clone());
}

pub fn prepaid_accrued(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&BaseKey::PrepayAccrued)
        .unwrap_or(0)
}

pub fn prepaid_reported(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&BaseKey::PrepayReported)
        .unwrap_or(0)
}

/// Record the source's cumulative total; totals never decrease
pub fn report_prepaid(env: &Env, caller: &Address, cumulative: i128) -> Result<(), YieldError> {
    if prepay_source(env).as_ref() != Some(caller) {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    if cumulative < prepaid_accrued(env) {
        return Err(YieldError::InvalidAmount);
    }
    env.storage().instance().set(&BaseKey::PrepayAccrued, &cumulative);
    Ok(())
}

/// Delta not yet reported by a harvest; marks it reported
pub fn take_prepaid_delta(env: &Env) -> i128 {
    let accrued = prepaid_accrued(env);
    let delta = accrued - prepaid_reported(env);
    if delta > 0 {
        env.storage().instance().set(&BaseKey::PrepayReported, &accrued);
    }
    delta.max(0)
}
