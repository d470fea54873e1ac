use crate::config::StrategyConfig;
use soroban_sdk::{Address, Env, IntoVal, Symbol};
use yield_types::YieldError;

pub fn governance(env: &Env, config: &StrategyConfig) -> Address {
    env.invoke_contract(
        &config.storage,
        &Symbol::new(env, "governance"),
        ().into_val(env),
    )
}

pub fn require_governance(env: &Env, config: &StrategyConfig, caller: &Address) -> Result<(), YieldError> {
    if *caller != governance(env, config) {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

pub fn require_vault(config: &StrategyConfig, caller: &Address) -> Result<(), YieldError> {
    if *caller != config.vault {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

pub fn require_vault_or_governance(
    env: &Env,
    config: &StrategyConfig,
    caller: &Address,
) -> Result<(), YieldError> {
    if *caller != config.vault && *caller != governance(env, config) {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}
