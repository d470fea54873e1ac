#![no_std]

//! Protocol-wide configuration: governance, controller and profit sharing.
//!
//! Vaults and strategies read their authorities from here instead of from
//! each other, because a contract already on the call stack cannot be
//! re-entered.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Symbol};
use yield_types::{YieldError, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, MAX_PROFIT_SHARING_BPS};

#[contract]
pub struct ProtocolStorage;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Governance,
    Controller,
    /// Receives the profit-sharing cut of every harvest
    FeeRecipient,
    /// Profit-sharing fee in basis points
    ProfitSharingBps,
}

#[contractimpl]
impl ProtocolStorage {
    pub fn initialize(env: Env, governance: Address, controller: Address) -> Result<(), YieldError> {
        if env.storage().instance().has(&DataKey::Governance) {
            return Err(YieldError::AlreadyInitialized);
        }
        governance.require_auth();

        let storage = env.storage().instance();
        storage.set(&DataKey::Governance, &governance);
        storage.set(&DataKey::Controller, &controller);
        storage.set(&DataKey::FeeRecipient, &governance);
        storage.set(&DataKey::ProfitSharingBps, &0u32);
        extend_instance_ttl(&env);

        env.events().publish(
            (Symbol::new(&env, "storage_initialized"),),
            (governance, controller),
        );
        Ok(())
    }

    pub fn governance(env: Env) -> Result<Address, YieldError> {
        extend_instance_ttl(&env);
        get_governance(&env)
    }

    pub fn controller(env: Env) -> Result<Address, YieldError> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Controller)
            .ok_or(YieldError::NotInitialized)
    }

    pub fn is_governance(env: Env, account: Address) -> bool {
        get_governance(&env).map(|g| g == account).unwrap_or(false)
    }

    pub fn is_controller(env: Env, account: Address) -> bool {
        Self::controller(env).map(|c| c == account).unwrap_or(false)
    }

    pub fn set_governance(env: Env, new_governance: Address) -> Result<(), YieldError> {
        let governance = get_governance(&env)?;
        governance.require_auth();

        env.storage().instance().set(&DataKey::Governance, &new_governance);
        extend_instance_ttl(&env);

        env.events().publish(
            (Symbol::new(&env, "governance_changed"),),
            (governance, new_governance),
        );
        Ok(())
    }

    pub fn set_controller(env: Env, new_controller: Address) -> Result<(), YieldError> {
        get_governance(&env)?.require_auth();

        env.storage().instance().set(&DataKey::Controller, &new_controller);
        extend_instance_ttl(&env);

        env.events()
            .publish((Symbol::new(&env, "controller_changed"),), new_controller);
        Ok(())
    }

    /// Set who receives the profit share of harvests and how large it is
    pub fn set_profit_sharing(env: Env, recipient: Address, bps: u32) -> Result<(), YieldError> {
        get_governance(&env)?.require_auth();
        if bps > MAX_PROFIT_SHARING_BPS {
            return Err(YieldError::InvalidRatio);
        }

        let storage = env.storage().instance();
        storage.set(&DataKey::FeeRecipient, &recipient);
        storage.set(&DataKey::ProfitSharingBps, &bps);
        extend_instance_ttl(&env);

        env.events()
            .publish((Symbol::new(&env, "profit_sharing_set"),), (recipient, bps));
        Ok(())
    }

    pub fn fee_recipient(env: Env) -> Result<Address, YieldError> {
        env.storage()
            .instance()
            .get(&DataKey::FeeRecipient)
            .ok_or(YieldError::NotInitialized)
    }

    pub fn profit_sharing_bps(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ProfitSharingBps)
            .unwrap_or(0)
    }
}

fn get_governance(env: &Env) -> Result<Address, YieldError> {
    env.storage()
        .instance()
        .get(&DataKey::Governance)
        .ok_or(YieldError::NotInitialized)
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}
