#![no_std]

//! Harvest controller.
//!
//! Whitelisted keepers (or governance) trigger vault harvests through this
//! contract, which is the `controller` registered in ProtocolStorage. It can
//! also relay arbitrary calls from a whitelisted caller to an approved target.

use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Env, IntoVal, Symbol, Val, Vec};
use yield_types::{
    YieldError, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND,
    PERSISTENT_TTL_THRESHOLD,
};


#[contract]
pub struct Controller;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Storage,
    Whitelisted(Address),
    ApprovedTarget(Address),
    /// Ledger timestamp of a vault's last harvest through this controller
    LastHarvest(Address),
}

#[contractimpl]
impl Controller {
    pub fn initialize(env: Env, storage: Address) -> Result<(), YieldError> {
        if env.storage().instance().has(&DataKey::Storage) {
            return Err(YieldError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Storage, &storage);
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn governance(env: Env) -> Result<Address, YieldError> {
        governance(&env)
    }

    // === Whitelist ===

    pub fn add_to_whitelist(env: Env, account: Address) -> Result<(), YieldError> {
        governance(&env)?.require_auth();
        set_flag(&env, DataKey::Whitelisted(account.clone()), true);
        env.events()
            .publish((Symbol::new(&env, "whitelist_added"),), account);
        Ok(())
    }

    pub fn remove_from_whitelist(env: Env, account: Address) -> Result<(), YieldError> {
        governance(&env)?.require_auth();
        set_flag(&env, DataKey::Whitelisted(account.clone()), false);
        env.events()
            .publish((Symbol::new(&env, "whitelist_removed"),), account);
        Ok(())
    }

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        get_flag(&env, DataKey::Whitelisted(account))
    }

    // === Call targets ===

    pub fn approve_target(env: Env, target: Address) -> Result<(), YieldError> {
        governance(&env)?.require_auth();
        set_flag(&env, DataKey::ApprovedTarget(target.clone()), true);
        env.events()
            .publish((Symbol::new(&env, "target_approved"),), target);
        Ok(())
    }

    pub fn revoke_target(env: Env, target: Address) -> Result<(), YieldError> {
        governance(&env)?.require_auth();
        set_flag(&env, DataKey::ApprovedTarget(target.clone()), false);
        env.events()
            .publish((Symbol::new(&env, "target_revoked"),), target);
        Ok(())
    }

    pub fn is_target_approved(env: Env, target: Address) -> bool {
        get_flag(&env, DataKey::ApprovedTarget(target))
    }

    // === Harvest ===

    /// Harvest one vault; returns its share price before and after
    pub fn harvest(env: Env, caller: Address, vault: Address) -> Result<(i128, i128), YieldError> {
        require_keeper(&env, &caller)?;
        Ok(harvest_vault(&env, &vault))
    }

    /// Harvest every vault in order; returns how many were harvested
    pub fn harvest_batch(env: Env, caller: Address, vaults: Vec<Address>) -> Result<u32, YieldError> {
        require_keeper(&env, &caller)?;
        for vault in vaults.iter() {
            harvest_vault(&env, &vault);
        }
        Ok(vaults.len())
    }

    pub fn last_harvest(env: Env, vault: Address) -> Option<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::LastHarvest(vault))
    }

    // === Relay ===

    /// Invoke `target.function(args)` on behalf of a whitelisted caller
    pub fn call(env: Env, caller: Address, target: Address, function: Symbol, args: Vec<Val>) -> Result<Val, YieldError> {
        if !get_flag(&env, DataKey::Whitelisted(caller.clone())) {
            return Err(YieldError::Unauthorized);
        }
        caller.require_auth();
        if !get_flag(&env, DataKey::ApprovedTarget(target.clone())) {
            return Err(YieldError::Unauthorized);
        }

        let result: Val = env.invoke_contract(&target, &function, args);
        env.events()
            .publish((Symbol::new(&env, "call"), caller, target), function);
        Ok(result)
    }
}

fn governance(env: &Env) -> Result<Address, YieldError> {
    extend_instance_ttl(env);
    let storage: Address = env
        .storage()
        .instance()
        .get(&DataKey::Storage)
        .ok_or(YieldError::NotInitialized)?;
    Ok(env.invoke_contract(&storage, &Symbol::new(env, "governance"), ().into_val(env)))
}

fn require_keeper(env: &Env, caller: &Address) -> Result<(), YieldError> {
    if !get_flag(env, DataKey::Whitelisted(caller.clone())) && *caller != governance(env)? {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

fn harvest_vault(env: &Env, vault: &Address) -> (i128, i128) {
    let me = env.current_contract_address();
    let prices: (i128, i128) = env.invoke_contract(vault, &Symbol::new(env, "harvest"), (me,).into_val(env));

    let key = DataKey::LastHarvest(vault.clone());
    env.storage().persistent().set(&key, &env.ledger().timestamp());
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);

    log!(env, "controller harvest", vault.clone(), prices.0, prices.1);
    env.events()
        .publish((Symbol::new(env, "harvested"), vault.clone()), prices);
    prices
}

fn get_flag(env: &Env, key: DataKey) -> bool {
    env.storage().persistent().get(&key).unwrap_or(false)
}

fn set_flag(env: &Env, key: DataKey, value: bool) {
    if value {
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    } else {
        env.storage().persistent().remove(&key);
    }
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}
