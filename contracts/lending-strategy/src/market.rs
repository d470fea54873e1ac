use soroban_sdk::{Address, Env, IntoVal, Symbol};

pub fn underlying(env: &Env, market: &Address) -> Address {
    env.invoke_contract(market, &Symbol::new(env, "underlying"), ().into_val(env))
}

pub fn supplied(env: &Env, market: &Address) -> i128 {
    env.invoke_contract(
        market,
        &Symbol::new(env, "balance"),
        (env.current_contract_address(),).into_val(env),
    )
}

pub fn supply(env: &Env, market: &Address, amount: i128) {
    env.invoke_contract::<()>(
        market,
        &Symbol::new(env, "supply"),
        (env.current_contract_address(), amount).into_val(env),
    );
}

pub fn withdraw(env: &Env, market: &Address, amount: i128) -> i128 {
    env.invoke_contract(
        market,
        &Symbol::new(env, "withdraw"),
        (env.current_contract_address(), amount).into_val(env),
    )
}

/// Pull pending market rewards into this contract
pub fn claim(env: &Env, market: &Address) -> i128 {
    env.invoke_contract(
        market,
        &Symbol::new(env, "claim"),
        (env.current_contract_address(),).into_val(env),
    )
}
