#![cfg(test)]

use super::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{contract, contractimpl, vec, Address, BytesN, Env, IntoVal, Symbol, Vec};

const HOUR: u64 = 60 * 60;

#[contract]
pub struct Counter;

#[contractimpl]
impl Counter {
    pub fn increment(env: Env, by: u32) -> u32 {
        let value: u32 = env.storage().instance().get(&0u32).unwrap_or(0) + by;
        env.storage().instance().set(&0u32, &value);
        value
    }

    pub fn get(env: Env) -> u32 {
        env.storage().instance().get(&0u32).unwrap_or(0)
    }

    pub fn fail(_env: Env) {
        panic!("call failed");
    }
}

struct Setup<'a> {
    env: Env,
    timelock: TimelockClient<'a>,
    admin: Address,
    counter: CounterClient<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let admin = Address::generate(&env);
    let timelock = TimelockClient::new(&env, &env.register(Timelock, ()));
    timelock.initialize(&admin, &(12 * HOUR), &None);
    let counter = CounterClient::new(&env, &env.register(Counter, ()));

    Setup {
        env,
        timelock,
        admin,
        counter,
    }
}

fn increment_call(s: &Setup, by: u32) -> Call {
    Call {
        target: s.counter.address.clone(),
        function: Symbol::new(&s.env, "increment"),
        args: vec![&s.env, by.into_val(&s.env)],
        value: 0,
    }
}

fn zero(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

fn salt(env: &Env, n: u8) -> BytesN<32> {
    BytesN::from_array(env, &[n; 32])
}

fn schedule(s: &Setup, calls: &Vec<Call>, predecessor: &BytesN<32>, n: u8) -> BytesN<32> {
    s.timelock
        .schedule(&s.admin, calls, predecessor, &salt(&s.env, n), &(12 * HOUR))
}

#[test]
fn test_admin_holds_every_role() {
    let s = setup();
    assert!(s.timelock.has_role(&Role::Proposer, &s.admin));
    assert!(s.timelock.has_role(&Role::Executor, &s.admin));
    assert!(s.timelock.has_role(&Role::Canceller, &s.admin));
    assert_eq!(s.timelock.min_delay(), 12 * HOUR);
    assert_eq!(
        s.timelock.try_initialize(&s.admin, &0, &None),
        Err(Ok(YieldError::AlreadyInitialized))
    );
}

#[test]
fn test_schedule_then_execute_after_delay() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let calls = vec![&s.env, increment_call(&s, 2), increment_call(&s, 3)];

    let id = schedule(&s, &calls, &zero(&s.env), 1);
    assert_eq!(id, s.timelock.hash_operation(&calls, &zero(&s.env), &salt(&s.env, 1)));
    assert_eq!(s.timelock.get_operation(&id).unwrap().ready_at, t + 12 * HOUR);

    s.env.ledger().set_timestamp(t + 12 * HOUR - 1);
    assert!(!s.timelock.is_operation_ready(&id));
    assert_eq!(
        s.timelock.try_execute(&s.admin, &id),
        Err(Ok(YieldError::NotReady))
    );

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert!(s.timelock.is_operation_ready(&id));
    s.timelock.execute(&s.admin, &id);
    assert_eq!(s.counter.get(), 5);
    assert!(s.timelock.is_operation_done(&id));
    assert!(!s.timelock.is_operation_ready(&id));

    assert_eq!(
        s.timelock.try_execute(&s.admin, &id),
        Err(Ok(YieldError::AlreadyExecuted))
    );
}

#[test]
fn test_ready_operation_stays_executable() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let id = schedule(&s, &vec![&s.env, increment_call(&s, 1)], &zero(&s.env), 1);

    s.env.ledger().set_timestamp(t + 400 * 24 * HOUR);
    s.timelock.execute(&s.admin, &id);
    assert_eq!(s.counter.get(), 1);
}

#[test]
fn test_schedule_validation() {
    let s = setup();
    let calls = vec![&s.env, increment_call(&s, 1)];

    assert_eq!(
        s.timelock
            .try_schedule(&s.admin, &calls, &zero(&s.env), &salt(&s.env, 1), &HOUR),
        Err(Ok(YieldError::DelayTooShort))
    );

    schedule(&s, &calls, &zero(&s.env), 1);
    assert_eq!(
        s.timelock
            .try_schedule(&s.admin, &calls, &zero(&s.env), &salt(&s.env, 1), &(24 * HOUR)),
        Err(Ok(YieldError::AlreadyScheduled))
    );

    // a different salt makes a distinct operation
    schedule(&s, &calls, &zero(&s.env), 2);
}

#[test]
fn test_unknown_operation() {
    let s = setup();
    assert_eq!(
        s.timelock.try_execute(&s.admin, &salt(&s.env, 9)),
        Err(Ok(YieldError::UnknownOperation))
    );
    assert_eq!(
        s.timelock.try_cancel(&s.admin, &salt(&s.env, 9)),
        Err(Ok(YieldError::UnknownOperation))
    );
    assert!(s.timelock.get_operation(&salt(&s.env, 9)).is_none());
}

#[test]
fn test_predecessor_must_execute_first() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let first = schedule(&s, &vec![&s.env, increment_call(&s, 1)], &zero(&s.env), 1);
    let second = schedule(&s, &vec![&s.env, increment_call(&s, 10)], &first, 2);

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(
        s.timelock.try_execute(&s.admin, &second),
        Err(Ok(YieldError::PredecessorNotMet))
    );

    s.timelock.execute(&s.admin, &first);
    s.timelock.execute(&s.admin, &second);
    assert_eq!(s.counter.get(), 11);
}

#[test]
fn test_failing_call_aborts_whole_batch() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let fail = Call {
        target: s.counter.address.clone(),
        function: Symbol::new(&s.env, "fail"),
        args: Vec::new(&s.env),
        value: 0,
    };
    let id = schedule(&s, &vec![&s.env, increment_call(&s, 1), fail], &zero(&s.env), 1);

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert!(s.timelock.try_execute(&s.admin, &id).is_err());
    assert_eq!(s.counter.get(), 0);
    assert!(!s.timelock.is_operation_done(&id));
    assert!(s.timelock.is_operation_ready(&id));
}

#[test]
fn test_cancel_only_before_execution() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let calls = vec![&s.env, increment_call(&s, 1)];

    let id = schedule(&s, &calls, &zero(&s.env), 1);
    s.timelock.cancel(&s.admin, &id);
    assert!(s.timelock.get_operation(&id).is_none());

    let id = schedule(&s, &calls, &zero(&s.env), 1);
    s.env.ledger().set_timestamp(t + 12 * HOUR);
    s.timelock.execute(&s.admin, &id);
    assert_eq!(
        s.timelock.try_cancel(&s.admin, &id),
        Err(Ok(YieldError::AlreadyExecuted))
    );
}

#[test]
fn test_roles_gate_each_step() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let proposer = Address::generate(&s.env);
    let executor = Address::generate(&s.env);
    let calls = vec![&s.env, increment_call(&s, 1)];

    assert_eq!(
        s.timelock
            .try_schedule(&proposer, &calls, &zero(&s.env), &salt(&s.env, 1), &(12 * HOUR)),
        Err(Ok(YieldError::Unauthorized))
    );

    s.timelock.grant_role(&Role::Proposer, &proposer);
    s.timelock.grant_role(&Role::Executor, &executor);
    let id = s
        .timelock
        .schedule(&proposer, &calls, &zero(&s.env), &salt(&s.env, 1), &(12 * HOUR));

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(
        s.timelock.try_execute(&proposer, &id),
        Err(Ok(YieldError::Unauthorized))
    );
    assert_eq!(
        s.timelock.try_cancel(&executor, &id),
        Err(Ok(YieldError::Unauthorized))
    );

    s.timelock.revoke_role(&Role::Executor, &executor);
    assert!(!s.timelock.has_role(&Role::Executor, &executor));
    assert_eq!(
        s.timelock.try_execute(&executor, &id),
        Err(Ok(YieldError::Unauthorized))
    );
    s.timelock.execute(&s.admin, &id);
    assert_eq!(s.counter.get(), 1);
}

#[test]
fn test_update_delay_waits_out_current_delay() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let calls = vec![&s.env, increment_call(&s, 1)];

    let change = s.timelock.update_delay(&0);
    assert_eq!(change, DelayChange { delay: 0, ready_at: t + 12 * HOUR });
    assert_eq!(s.timelock.pending_delay(), Some(change));

    // the old delay still binds until the change matures
    assert_eq!(s.timelock.min_delay(), 12 * HOUR);
    assert_eq!(
        s.timelock
            .try_schedule(&s.admin, &calls, &zero(&s.env), &salt(&s.env, 1), &0),
        Err(Ok(YieldError::DelayTooShort))
    );

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(s.timelock.min_delay(), 0);
    assert_eq!(s.timelock.pending_delay(), None);
    let id = s
        .timelock
        .schedule(&s.admin, &calls, &zero(&s.env), &salt(&s.env, 1), &0);
    s.timelock.execute(&s.admin, &id);
    assert_eq!(s.counter.get(), 1);
}

#[test]
fn test_update_delay_replaces_queued_change() {
    let s = setup();
    let t = s.env.ledger().timestamp();

    s.timelock.update_delay(&HOUR);
    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(s.timelock.min_delay(), HOUR);

    // matured change is kept, the new one waits out the hour
    let change = s.timelock.update_delay(&(24 * HOUR));
    assert_eq!(change.ready_at, t + 13 * HOUR);
    assert_eq!(s.timelock.min_delay(), HOUR);
    s.env.ledger().set_timestamp(t + 13 * HOUR);
    assert_eq!(s.timelock.min_delay(), 24 * HOUR);
}

#[test]
fn test_call_value_is_forwarded_in_native_token() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let timelock = TimelockClient::new(&env, &env.register(Timelock, ()));
    timelock.initialize(&admin, &0, &Some(native.clone()));
    StellarAssetClient::new(&env, &native).mint(&timelock.address, &500);
    let counter = env.register(Counter, ());

    let calls = vec![
        &env,
        Call {
            target: counter.clone(),
            function: Symbol::new(&env, "increment"),
            args: vec![&env, 1u32.into_val(&env)],
            value: 200,
        },
    ];
    let id = timelock.schedule(&admin, &calls, &zero(&env), &salt(&env, 1), &0);
    timelock.execute(&admin, &id);

    assert_eq!(TokenClient::new(&env, &native).balance(&counter), 200);
    assert_eq!(TokenClient::new(&env, &native).balance(&timelock.address), 300);
}
