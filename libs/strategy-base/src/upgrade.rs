use crate::config::{extend_instance_ttl, load_config, BaseKey};
use soroban_sdk::{log, BytesN, Env, Symbol};
use yield_types::{UpgradeSchedule, YieldError};

/// Record `implementation` to be installed after the configured delay.
/// Rescheduling replaces the pending implementation and restarts the wait.
pub fn schedule_upgrade(env: &Env, implementation: BytesN<32>) -> Result<UpgradeSchedule, YieldError> {
    let config = load_config(env)?;
    let schedule = UpgradeSchedule::new(
        implementation,
        env.ledger().timestamp(),
        config.upgrade_delay,
    );
    env.storage().instance().set(&BaseKey::StrategyUpgrade, &schedule);
    extend_instance_ttl(env);

    env.events().publish(
        (Symbol::new(env, "upgrade_scheduled"),),
        (schedule.implementation.clone(), schedule.ready_at),
    );
    Ok(schedule)
}

pub fn upgrade_schedule(env: &Env) -> Option<UpgradeSchedule> {
    env.storage().instance().get(&BaseKey::StrategyUpgrade)
}

/// Install the scheduled implementation. The contract address, and with it
/// every balance and position the strategy owns, stays the same.
pub fn upgrade(env: &Env) -> Result<BytesN<32>, YieldError> {
    let schedule = upgrade_schedule(env).ok_or(YieldError::NothingScheduled)?;
    let implementation = schedule.take_if_ready(env.ledger().timestamp())?;

    env.storage().instance().remove(&BaseKey::StrategyUpgrade);
    log!(env, "strategy upgrade", implementation);
    env.events().publish(
        (Symbol::new(env, "upgraded"),),
        implementation.clone(),
    );

    env.deployer()
        .update_current_contract_wasm(implementation.clone());
    Ok(implementation)
}

pub fn cancel_upgrade(env: &Env) -> Result<(), YieldError> {
    if upgrade_schedule(env).is_none() {
        return Err(YieldError::NothingScheduled);
    }
    env.storage().instance().remove(&BaseKey::StrategyUpgrade);
    env.events()
        .publish((Symbol::new(env, "upgrade_cancelled"),), ());
    Ok(())
}
