//! Calls from the vault into its strategy. The vault is always the direct
//! invoker, so the strategy's `require_auth` on the vault address passes
//! without extra authorization entries.

use soroban_sdk::{Address, BytesN, Env, IntoVal, Symbol};
use yield_types::UpgradeSchedule;

pub fn underlying(env: &Env, strategy: &Address) -> Address {
    env.invoke_contract(strategy, &Symbol::new(env, "underlying"), ().into_val(env))
}

pub fn vault(env: &Env, strategy: &Address) -> Address {
    env.invoke_contract(strategy, &Symbol::new(env, "vault"), ().into_val(env))
}

pub fn invested_underlying_balance(env: &Env, strategy: &Address) -> i128 {
    env.invoke_contract(
        strategy,
        &Symbol::new(env, "invested_underlying_balance"),
        ().into_val(env),
    )
}

pub fn do_hard_work(env: &Env, strategy: &Address) -> i128 {
    let me = env.current_contract_address();
    env.invoke_contract(strategy, &Symbol::new(env, "do_hard_work"), (me,).into_val(env))
}

pub fn withdraw_to_vault(env: &Env, strategy: &Address, amount: i128) -> i128 {
    let me = env.current_contract_address();
    env.invoke_contract(
        strategy,
        &Symbol::new(env, "withdraw_to_vault"),
        (me, amount).into_val(env),
    )
}

pub fn withdraw_all_to_vault(env: &Env, strategy: &Address) -> i128 {
    let me = env.current_contract_address();
    env.invoke_contract(
        strategy,
        &Symbol::new(env, "withdraw_all_to_vault"),
        (me, false).into_val(env),
    )
}

pub fn schedule_upgrade(env: &Env, strategy: &Address, implementation: &BytesN<32>) -> UpgradeSchedule {
    let me = env.current_contract_address();
    env.invoke_contract(
        strategy,
        &Symbol::new(env, "schedule_upgrade"),
        (me, implementation.clone()).into_val(env),
    )
}

pub fn upgrade(env: &Env, strategy: &Address) {
    let me = env.current_contract_address();
    env.invoke_contract::<()>(strategy, &Symbol::new(env, "upgrade"), (me,).into_val(env));
}

pub fn cancel_upgrade(env: &Env, strategy: &Address) {
    let me = env.current_contract_address();
    env.invoke_contract::<()>(strategy, &Symbol::new(env, "cancel_upgrade"), (me,).into_val(env));
}
