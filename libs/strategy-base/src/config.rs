use soroban_sdk::{contracttype, Address, Env, IntoVal, Symbol, Vec};
use yield_types::{YieldError, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, MIN_UPGRADE_DELAY};

/// Storage keys owned by the shared strategy code
#[contracttype]
#[derive(Clone)]
pub enum BaseKey {
    StrategyConfig,
    RewardTokens,
    StrategyUpgrade,
    PrepaySource,
    PrepayAccrued,
    PrepayReported,
}

/// Wiring every strategy is initialized with
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyConfig {
    /// ProtocolStorage contract (governance, fee config)
    pub storage: Address,
    pub vault: Address,
    pub underlying: Address,
    pub registry: Address,
    /// Venue used to liquidate rewards and rebalance token splits
    pub venue: Symbol,
    /// Minimum wait between scheduling and executing an upgrade
    pub upgrade_delay: u64,
}

/// Store the configuration once; the vault must agree on the underlying
/// and upgrades must wait at least `MIN_UPGRADE_DELAY`
pub fn init_config(env: &Env, config: &StrategyConfig, reward_tokens: &Vec<Address>) -> Result<(), YieldError> {
    if env.storage().instance().has(&BaseKey::StrategyConfig) {
        return Err(YieldError::AlreadyInitialized);
    }
    if config.upgrade_delay < MIN_UPGRADE_DELAY {
        return Err(YieldError::InvalidConfig);
    }

    let vault_underlying: Address = env.invoke_contract(
        &config.vault,
        &Symbol::new(env, "underlying"),
        ().into_val(env),
    );
    if vault_underlying != config.underlying {
        return Err(YieldError::UnderlyingMismatch);
    }

    env.storage().instance().set(&BaseKey::StrategyConfig, config);
    env.storage().instance().set(&BaseKey::RewardTokens, reward_tokens);
    extend_instance_ttl(env);
    Ok(())
}

pub fn load_config(env: &Env) -> Result<StrategyConfig, YieldError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&BaseKey::StrategyConfig)
        .ok_or(YieldError::NotInitialized)
}

pub fn set_venue(env: &Env, venue: Symbol) -> Result<(), YieldError> {
    let mut config = load_config(env)?;
    config.venue = venue;
    env.storage().instance().set(&BaseKey::StrategyConfig, &config);
    Ok(())
}

pub fn reward_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&BaseKey::RewardTokens)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_reward_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage().instance().set(&BaseKey::RewardTokens, tokens);
    env.events()
        .publish((Symbol::new(env, "reward_tokens_set"),), tokens.len());
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}
