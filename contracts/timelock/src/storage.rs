use soroban_sdk::{contracttype, Address, BytesN, Env};
use yield_types::{
    DelayChange, Operation, Role, YieldError, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD,
    PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD,
};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    MinDelay,
    PendingDelay,
    /// Token used to forward call values
    NativeToken,
    /// (role, account) -> granted (Persistent storage)
    Role(Role, Address),
    /// id -> operation (Persistent storage)
    Operation(BytesN<32>),
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

pub fn get_admin(env: &Env) -> Result<Address, YieldError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(YieldError::NotInitialized)
}

/// Delay in force now, counting a pending change whose wait has passed
pub fn get_min_delay(env: &Env) -> u64 {
    match get_pending_delay(env) {
        Some(change) if env.ledger().timestamp() >= change.ready_at => change.delay,
        _ => env.storage().instance().get(&DataKey::MinDelay).unwrap_or(0),
    }
}

pub fn set_min_delay(env: &Env, delay: u64) {
    env.storage().instance().set(&DataKey::MinDelay, &delay);
}

pub fn get_pending_delay(env: &Env) -> Option<DelayChange> {
    env.storage().instance().get(&DataKey::PendingDelay)
}

/// Replace any pending change; an already effective one is folded in first
pub fn set_pending_delay(env: &Env, change: &DelayChange) {
    set_min_delay(env, get_min_delay(env));
    env.storage().instance().set(&DataKey::PendingDelay, change);
}

pub fn get_native_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::NativeToken)
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Role(role, account.clone()))
}

pub fn set_role(env: &Env, role: Role, account: &Address, granted: bool) {
    let key = DataKey::Role(role, account.clone());
    if granted {
        env.storage().persistent().set(&key, &true);
        extend_persistent_ttl(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn get_operation(env: &Env, id: &BytesN<32>) -> Option<Operation> {
    env.storage()
        .persistent()
        .get(&DataKey::Operation(id.clone()))
}

pub fn set_operation(env: &Env, id: &BytesN<32>, operation: &Operation) {
    let key = DataKey::Operation(id.clone());
    env.storage().persistent().set(&key, operation);
    extend_persistent_ttl(env, &key);
}

pub fn remove_operation(env: &Env, id: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::Operation(id.clone()));
}
