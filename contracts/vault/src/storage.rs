use soroban_sdk::{contracttype, Address, Env};
use yield_types::{
    InvestRatio, StrategySlot, UpgradeSchedule, YieldError, INSTANCE_TTL_EXTEND,
    INSTANCE_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD,
};

/// Storage keys for the vault contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Fixed wiring (Instance storage)
    Config,
    /// Strategy slot state machine (Instance storage)
    Slot,
    InvestRatio,
    InvestOnDeposit,
    TotalSupply,
    /// Pending self-upgrade (Instance storage)
    UpgradeSchedule,
    /// Share balance per holder (Persistent storage)
    Balance(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    /// ProtocolStorage contract holding governance and controller
    pub storage: Address,
    pub underlying: Address,
    /// 10^decimals of the underlying
    pub unit: i128,
    /// Wait between announcing and committing a strategy or upgrade
    pub min_delay: u64,
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<VaultConfig, YieldError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(YieldError::NotInitialized)
}

pub fn set_config(env: &Env, config: &VaultConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Strategy slot ===

pub fn get_slot(env: &Env) -> StrategySlot {
    env.storage()
        .instance()
        .get(&DataKey::Slot)
        .unwrap_or(StrategySlot::Empty)
}

pub fn set_slot(env: &Env, slot: &StrategySlot) {
    env.storage().instance().set(&DataKey::Slot, slot);
}

// === Investing ===

pub fn get_invest_ratio(env: &Env) -> InvestRatio {
    env.storage()
        .instance()
        .get(&DataKey::InvestRatio)
        .unwrap_or_else(InvestRatio::full)
}

pub fn set_invest_ratio(env: &Env, ratio: &InvestRatio) {
    env.storage().instance().set(&DataKey::InvestRatio, ratio);
}

pub fn get_invest_on_deposit(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::InvestOnDeposit)
        .unwrap_or(false)
}

pub fn set_invest_on_deposit(env: &Env, enabled: bool) {
    env.storage().instance().set(&DataKey::InvestOnDeposit, &enabled);
}

// === Shares ===

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

fn set_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn get_balance(env: &Env, holder: &Address) -> i128 {
    let key = DataKey::Balance(holder.clone());
    let balance = env.storage().persistent().get(&key).unwrap_or(0);
    if balance != 0 {
        extend_persistent_ttl(env, &key);
    }
    balance
}

fn set_balance(env: &Env, holder: &Address, balance: i128) {
    let key = DataKey::Balance(holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        extend_persistent_ttl(env, &key);
    }
}

pub fn mint_shares(env: &Env, to: &Address, shares: i128) {
    set_balance(env, to, get_balance(env, to) + shares);
    set_total_supply(env, get_total_supply(env) + shares);
}

pub fn burn_shares(env: &Env, from: &Address, shares: i128) -> Result<(), YieldError> {
    let balance = get_balance(env, from);
    if shares > balance {
        return Err(YieldError::InsufficientShares);
    }
    set_balance(env, from, balance - shares);
    set_total_supply(env, get_total_supply(env) - shares);
    Ok(())
}

pub fn move_shares(env: &Env, from: &Address, to: &Address, shares: i128) -> Result<(), YieldError> {
    let balance = get_balance(env, from);
    if shares > balance {
        return Err(YieldError::InsufficientShares);
    }
    set_balance(env, from, balance - shares);
    set_balance(env, to, get_balance(env, to) + shares);
    Ok(())
}

// === Self-upgrade ===

pub fn get_upgrade(env: &Env) -> Option<UpgradeSchedule> {
    env.storage().instance().get(&DataKey::UpgradeSchedule)
}

pub fn set_upgrade(env: &Env, schedule: &UpgradeSchedule) {
    env.storage().instance().set(&DataKey::UpgradeSchedule, schedule);
}

pub fn clear_upgrade(env: &Env) {
    env.storage().instance().remove(&DataKey::UpgradeSchedule);
}
