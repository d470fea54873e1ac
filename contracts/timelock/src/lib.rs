#![no_std]

//! Timelock gate for governance actions.
//!
//! A proposer schedules a batch of calls that becomes executable after at
//! least `min_delay` seconds. An executor runs the whole batch atomically and
//! at most once; a canceller may drop it before it runs. When the timelock
//! is the governance address in ProtocolStorage, every governance action of
//! the protocol goes through this delay.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{contract, contractimpl, log, token, Address, BytesN, Env, Symbol, Val, Vec};
use yield_types::{ready_at, Call, DelayChange, Operation, Role, YieldError};

mod storage;

#[cfg(test)]
mod test;

#[contract]
pub struct Timelock;

#[contractimpl]
impl Timelock {
    /// The admin starts with every role
    pub fn initialize(env: Env, admin: Address, min_delay: u64, native_token: Option<Address>) -> Result<(), YieldError> {
        if env.storage().instance().has(&storage::DataKey::Admin) {
            return Err(YieldError::AlreadyInitialized);
        }
        env.storage().instance().set(&storage::DataKey::Admin, &admin);
        storage::set_min_delay(&env, min_delay);
        if let Some(token) = native_token {
            env.storage()
                .instance()
                .set(&storage::DataKey::NativeToken, &token);
        }
        for role in [Role::Proposer, Role::Executor, Role::Canceller] {
            storage::set_role(&env, role, &admin, true);
        }
        storage::extend_instance_ttl(&env);

        env.events()
            .publish((Symbol::new(&env, "timelock_initialized"),), (admin, min_delay));
        Ok(())
    }

    // === Roles ===

    pub fn grant_role(env: Env, role: Role, account: Address) -> Result<(), YieldError> {
        storage::get_admin(&env)?.require_auth();
        storage::set_role(&env, role, &account, true);
        env.events()
            .publish((Symbol::new(&env, "role_granted"), account), role);
        Ok(())
    }

    pub fn revoke_role(env: Env, role: Role, account: Address) -> Result<(), YieldError> {
        storage::get_admin(&env)?.require_auth();
        storage::set_role(&env, role, &account, false);
        env.events()
            .publish((Symbol::new(&env, "role_revoked"), account), role);
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        storage::has_role(&env, role, &account)
    }

    pub fn min_delay(env: Env) -> u64 {
        storage::get_min_delay(&env)
    }

    /// Queued delay change that has not taken effect yet
    pub fn pending_delay(env: Env) -> Option<DelayChange> {
        storage::get_pending_delay(&env).filter(|change| env.ledger().timestamp() < change.ready_at)
    }

    /// Queue `new_delay`. It takes effect once the current delay has passed,
    /// so the gate can never be shortened faster than it allows.
    pub fn update_delay(env: Env, new_delay: u64) -> Result<DelayChange, YieldError> {
        storage::get_admin(&env)?.require_auth();
        let old_delay = storage::get_min_delay(&env);
        let change = DelayChange {
            delay: new_delay,
            ready_at: ready_at(env.ledger().timestamp(), old_delay),
        };
        storage::set_pending_delay(&env, &change);
        storage::extend_instance_ttl(&env);
        env.events().publish(
            (Symbol::new(&env, "min_delay_change_queued"),),
            (old_delay, new_delay, change.ready_at),
        );
        Ok(change)
    }

    // === Operations ===

    pub fn hash_operation(env: Env, calls: Vec<Call>, predecessor: BytesN<32>, salt: BytesN<32>) -> BytesN<32> {
        operation_id(&env, &calls, &predecessor, &salt)
    }

    /// Schedule `calls`, executable `delay` seconds from now. Returns the id.
    pub fn schedule(
        env: Env,
        caller: Address,
        calls: Vec<Call>,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
        delay: u64,
    ) -> Result<BytesN<32>, YieldError> {
        require_role(&env, Role::Proposer, &caller)?;
        if delay < storage::get_min_delay(&env) {
            return Err(YieldError::DelayTooShort);
        }

        let id = operation_id(&env, &calls, &predecessor, &salt);
        if storage::get_operation(&env, &id).is_some() {
            return Err(YieldError::AlreadyScheduled);
        }

        let operation = Operation {
            calls,
            predecessor,
            salt,
            ready_at: ready_at(env.ledger().timestamp(), delay),
            executed: false,
        };
        storage::set_operation(&env, &id, &operation);

        env.events().publish(
            (Symbol::new(&env, "call_scheduled"), id.clone()),
            (operation.calls.len(), operation.ready_at),
        );
        Ok(id)
    }

    /// Run every call of a ready operation in order. A failing call aborts
    /// the transaction, so the operation stays executable.
    pub fn execute(env: Env, caller: Address, id: BytesN<32>) -> Result<(), YieldError> {
        require_role(&env, Role::Executor, &caller)?;

        let mut operation = storage::get_operation(&env, &id).ok_or(YieldError::UnknownOperation)?;
        if operation.executed {
            return Err(YieldError::AlreadyExecuted);
        }
        if env.ledger().timestamp() < operation.ready_at {
            return Err(YieldError::NotReady);
        }
        if !is_none(&env, &operation.predecessor) && !is_done(&env, &operation.predecessor) {
            return Err(YieldError::PredecessorNotMet);
        }

        operation.executed = true;
        storage::set_operation(&env, &id, &operation);

        let me = env.current_contract_address();
        for call in operation.calls.iter() {
            if call.value > 0 {
                let native = storage::get_native_token(&env).ok_or(YieldError::InvalidConfig)?;
                token::Client::new(&env, &native).transfer(&me, &call.target, &call.value);
            }
            env.invoke_contract::<Val>(&call.target, &call.function, call.args.clone());
            log!(&env, "timelock call", call.target, call.function);
        }

        env.events()
            .publish((Symbol::new(&env, "call_executed"), id), operation.calls.len());
        Ok(())
    }

    pub fn cancel(env: Env, caller: Address, id: BytesN<32>) -> Result<(), YieldError> {
        require_role(&env, Role::Canceller, &caller)?;
        let operation = storage::get_operation(&env, &id).ok_or(YieldError::UnknownOperation)?;
        if operation.executed {
            return Err(YieldError::AlreadyExecuted);
        }
        storage::remove_operation(&env, &id);
        env.events()
            .publish((Symbol::new(&env, "cancelled"), id), ());
        Ok(())
    }

    // === Views ===

    pub fn get_operation(env: Env, id: BytesN<32>) -> Option<Operation> {
        storage::get_operation(&env, &id)
    }

    /// Scheduled, not executed and past its delay
    pub fn is_operation_ready(env: Env, id: BytesN<32>) -> bool {
        storage::get_operation(&env, &id)
            .map(|op| !op.executed && env.ledger().timestamp() >= op.ready_at)
            .unwrap_or(false)
    }

    pub fn is_operation_done(env: Env, id: BytesN<32>) -> bool {
        is_done(&env, &id)
    }
}

fn require_role(env: &Env, role: Role, caller: &Address) -> Result<(), YieldError> {
    if !storage::has_role(env, role, caller) {
        return Err(YieldError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

fn operation_id(env: &Env, calls: &Vec<Call>, predecessor: &BytesN<32>, salt: &BytesN<32>) -> BytesN<32> {
    let payload = (calls.clone(), predecessor.clone(), salt.clone()).to_xdr(env);
    env.crypto().sha256(&payload).into()
}

fn is_none(env: &Env, id: &BytesN<32>) -> bool {
    *id == BytesN::from_array(env, &[0u8; 32])
}

fn is_done(env: &Env, id: &BytesN<32>) -> bool {
    storage::get_operation(env, id)
        .map(|op| op.executed)
        .unwrap_or(false)
}
