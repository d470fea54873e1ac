#![cfg(test)]

use super::*;
use controller::{Controller, ControllerClient};
use lending_strategy::{LendingStrategy, LendingStrategyClient};
use liquidation_registry::{LiquidationRegistry, LiquidationRegistryClient};
use protocol_storage::{ProtocolStorage, ProtocolStorageClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{symbol_short, vec, Address, Bytes, BytesN, Env, IntoVal, Symbol, Vec};
use timelock::{Timelock, TimelockClient};
use yield_mocks::{MockLendingMarket, MockLendingMarketClient, MockSwapAdapter, MockSwapAdapterClient};
use yield_types::{Call, PendingStrategy};

const HOUR: u64 = 60 * 60;
const DELAY: u64 = 13 * HOUR;
const UNIT: i128 = 10_000_000; // 7 decimals

/// Smallest module the host accepts: env meta for protocol 22 and one
/// export, `version() -> u32`, returning 7
const VERSION_WASM: &[u8] = &[
    0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, 0x01, 0x05, 0x01, 0x60, 0x00, 0x01, 0x7e, 0x03,
    0x02, 0x01, 0x00, 0x07, 0x0b, 0x01, 0x07, 0x76, 0x65, 0x72, 0x73, 0x69, 0x6f, 0x6e, 0x00, 0x00,
    0x0a, 0x0b, 0x01, 0x09, 0x00, 0x42, 0x84, 0x80, 0x80, 0x80, 0xf0, 0x00, 0x0b, 0x00, 0x1e, 0x11,
    0x63, 0x6f, 0x6e, 0x74, 0x72, 0x61, 0x63, 0x74, 0x65, 0x6e, 0x76, 0x6d, 0x65, 0x74, 0x61, 0x76,
    0x30, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x16, 0x00, 0x00, 0x00, 0x00,
];

struct Setup<'a> {
    env: Env,
    vault: VaultClient<'a>,
    storage: ProtocolStorageClient<'a>,
    registry: LiquidationRegistryClient<'a>,
    controller: ControllerClient<'a>,
    market: MockLendingMarketClient<'a>,
    governance: Address,
    underlying: Address,
    reward: Address,
}

fn create_token(env: &Env) -> Address {
    let admin = Address::generate(env);
    env.register_stellar_asset_contract_v2(admin).address()
}

fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    StellarAssetClient::new(env, token).mint(to, &amount);
}

fn balance(env: &Env, token: &Address, owner: &Address) -> i128 {
    TokenClient::new(env, token).balance(owner)
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();
    env.ledger().set_timestamp(1_700_000_000);

    let governance = Address::generate(&env);
    let controller = ControllerClient::new(&env, &env.register(Controller, ()));
    let storage = ProtocolStorageClient::new(&env, &env.register(ProtocolStorage, ()));
    storage.initialize(&governance, &controller.address);
    controller.initialize(&storage.address);

    let registry = LiquidationRegistryClient::new(&env, &env.register(LiquidationRegistry, ()));
    registry.initialize(&governance);

    let underlying = create_token(&env);
    let reward = create_token(&env);

    let market = MockLendingMarketClient::new(&env, &env.register(MockLendingMarket, ()));
    market.initialize(&underlying, &reward);

    // 1 reward token sells for 2 underlying
    let adapter = env.register(MockSwapAdapter, ());
    MockSwapAdapterClient::new(&env, &adapter).set_rate(&reward, &underlying, &2, &1);
    mint(&env, &underlying, &adapter, 1_000_000 * UNIT);
    let venue = symbol_short!("uniV3");
    registry.set_venue(&venue, &adapter);
    registry.set_path(&venue, &vec![&env, reward.clone(), underlying.clone()]);

    let vault = VaultClient::new(&env, &env.register(Vault, ()));
    vault.initialize(&storage.address, &underlying, &DELAY);

    Setup {
        env,
        vault,
        storage,
        registry,
        controller,
        market,
        governance,
        underlying,
        reward,
    }
}

/// Lending strategy bound to `vault` over the shared market
fn new_strategy<'a>(s: &Setup<'a>, vault: &Address, underlying: &Address, market: &Address) -> LendingStrategyClient<'a> {
    let strategy = LendingStrategyClient::new(&s.env, &s.env.register(LendingStrategy, ()));
    strategy.initialize(
        &s.storage.address,
        vault,
        underlying,
        &s.registry.address,
        market,
        &vec![&s.env, s.reward.clone()],
        &symbol_short!("uniV3"),
        &DELAY,
    );
    strategy
}

fn strategy<'a>(s: &Setup<'a>) -> LendingStrategyClient<'a> {
    new_strategy(s, &s.vault.address, &s.underlying, &s.market.address)
}

/// Announce, wait out the delay and commit
fn activate(s: &Setup, strategy: &Address) {
    s.vault.announce_strategy_update(strategy);
    let t = s.env.ledger().timestamp();
    s.env.ledger().set_timestamp(t + DELAY);
    s.vault.set_strategy(strategy);
}

fn deposit(s: &Setup, user: &Address, amount: i128) -> i128 {
    mint(&s.env, &s.underlying, user, amount);
    let expiration = s.env.ledger().sequence() + 1_000;
    TokenClient::new(&s.env, &s.underlying).approve(user, &s.vault.address, &amount, &expiration);
    s.vault.deposit(user, &amount, user)
}

fn harvest(s: &Setup) -> (i128, i128) {
    s.vault.harvest(&s.controller.address)
}

// === Initialization ===

#[test]
fn test_initialize() {
    let s = setup();
    assert_eq!(s.vault.underlying(), s.underlying);
    assert_eq!(s.vault.underlying_unit(), UNIT);
    assert_eq!(s.vault.min_delay(), DELAY);
    assert_eq!(s.vault.get_price_per_full_share(), UNIT);
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Empty);
    assert_eq!(s.vault.strategy(), None);
    assert_eq!(s.vault.vault_fraction_to_invest(), InvestRatio::full());
    assert!(!s.vault.invest_on_deposit());

    assert_eq!(
        s.vault.try_initialize(&s.storage.address, &s.underlying, &DELAY),
        Err(Ok(YieldError::AlreadyInitialized))
    );

    let other = VaultClient::new(&s.env, &s.env.register(Vault, ()));
    other.initialize(&s.storage.address, &s.underlying, &0);
    assert_eq!(other.min_delay(), DEFAULT_MIN_DELAY);
}

// === Share accounting ===

#[test]
fn test_share_price_scenario() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);

    assert_eq!(deposit(&s, &alice, 1_000 * UNIT), 1_000 * UNIT);
    assert_eq!(s.vault.get_price_per_full_share(), UNIT);

    // 100 units of yield
    mint(&s.env, &s.underlying, &s.vault.address, 100 * UNIT);
    assert_eq!(s.vault.get_price_per_full_share(), 11 * UNIT / 10);

    assert_eq!(deposit(&s, &bob, 1_100 * UNIT), 1_000 * UNIT);
    assert_eq!(s.vault.get_price_per_full_share(), 11 * UNIT / 10);
    assert_eq!(s.vault.total_supply(), 2_000 * UNIT);
    assert_eq!(s.vault.holder_balance_with_investment(&bob), 1_100 * UNIT);
}

#[test]
fn test_deposit_checks() {
    let s = setup();
    let alice = Address::generate(&s.env);

    assert_eq!(
        s.vault.try_deposit(&alice, &0, &alice),
        Err(Ok(YieldError::InvalidAmount))
    );

    mint(&s.env, &s.underlying, &alice, 50);
    assert_eq!(
        s.vault.try_deposit(&alice, &50, &alice),
        Err(Ok(YieldError::InsufficientAllowance))
    );

    let expiration = s.env.ledger().sequence() + 1_000;
    TokenClient::new(&s.env, &s.underlying).approve(&alice, &s.vault.address, &100, &expiration);
    assert_eq!(
        s.vault.try_deposit(&alice, &100, &alice),
        Err(Ok(YieldError::TransferFailed))
    );

    assert_eq!(s.vault.deposit(&alice, &50, &alice), 50);
}

#[test]
fn test_deposit_mints_to_beneficiary() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    mint(&s.env, &s.underlying, &alice, 10 * UNIT);
    let expiration = s.env.ledger().sequence() + 1_000;
    TokenClient::new(&s.env, &s.underlying).approve(&alice, &s.vault.address, &(10 * UNIT), &expiration);

    s.vault.deposit(&alice, &(10 * UNIT), &bob);
    assert_eq!(s.vault.balance_of(&alice), 0);
    assert_eq!(s.vault.balance_of(&bob), 10 * UNIT);
}

#[test]
fn test_round_trip_loses_at_most_one_unit() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);

    deposit(&s, &alice, 1_000 * UNIT);
    mint(&s.env, &s.underlying, &s.vault.address, 333 * UNIT + 7);
    let price = s.vault.get_price_per_full_share();

    let amount = 777_777_777;
    deposit(&s, &bob, amount);
    let paid = s.vault.withdraw_all(&bob);
    assert!(paid <= amount);
    assert!(paid >= amount - 1);
    assert_eq!(balance(&s.env, &s.underlying, &bob), paid);
    assert!(s.vault.get_price_per_full_share() >= price);
}

#[test]
fn test_withdraw_more_than_balance() {
    let s = setup();
    let alice = Address::generate(&s.env);
    deposit(&s, &alice, 100);
    assert_eq!(
        s.vault.try_withdraw(&alice, &101),
        Err(Ok(YieldError::InsufficientShares))
    );
    assert_eq!(
        s.vault.try_withdraw(&alice, &0),
        Err(Ok(YieldError::InvalidAmount))
    );
}

#[test]
fn test_transfer_shares() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    deposit(&s, &alice, 100);

    s.vault.transfer(&alice, &bob, &40);
    assert_eq!(s.vault.balance_of(&alice), 60);
    assert_eq!(s.vault.balance_of(&bob), 40);
    assert_eq!(s.vault.total_supply(), 100);
    assert_eq!(
        s.vault.try_transfer(&alice, &bob, &61),
        Err(Ok(YieldError::InsufficientShares))
    );

    assert_eq!(s.vault.withdraw_all(&bob), 40);
}

// === Strategy swap ===

#[test]
fn test_set_strategy_waits_for_delay() {
    let s = setup();
    let strategy = strategy(&s);
    let t = s.env.ledger().timestamp();

    assert_eq!(s.vault.announce_strategy_update(&strategy.address), t + DELAY);
    assert_eq!(
        s.vault.strategy_slot(),
        StrategySlot::AnnouncedPending(PendingStrategy {
            current: None,
            next: strategy.address.clone(),
            ready_at: t + DELAY,
        })
    );

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(
        s.vault.try_set_strategy(&strategy.address),
        Err(Ok(YieldError::TooEarly))
    );

    s.env.ledger().set_timestamp(t + DELAY);
    s.vault.set_strategy(&strategy.address);
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(strategy.address.clone()));
    assert_eq!(s.vault.strategy(), Some(strategy.address.clone()));
}

#[test]
fn test_set_strategy_errors() {
    let s = setup();
    let strategy = strategy(&s);

    assert_eq!(
        s.vault.try_set_strategy(&strategy.address),
        Err(Ok(YieldError::NothingScheduled))
    );

    let other = self::strategy(&s);
    s.vault.announce_strategy_update(&strategy.address);
    s.env.ledger().set_timestamp(s.env.ledger().timestamp() + DELAY);
    assert_eq!(
        s.vault.try_set_strategy(&other.address),
        Err(Ok(YieldError::StrategyMismatch))
    );

    // same asset, different vault
    let other_vault = VaultClient::new(&s.env, &s.env.register(Vault, ()));
    other_vault.initialize(&s.storage.address, &s.underlying, &DELAY);
    let foreign = new_strategy(&s, &other_vault.address, &s.underlying, &s.market.address);
    s.vault.announce_strategy_update(&foreign.address);
    s.env.ledger().set_timestamp(s.env.ledger().timestamp() + DELAY);
    assert_eq!(
        s.vault.try_set_strategy(&foreign.address),
        Err(Ok(YieldError::StrategyMismatch))
    );

    // different asset
    let token = create_token(&s.env);
    let token_vault = VaultClient::new(&s.env, &s.env.register(Vault, ()));
    token_vault.initialize(&s.storage.address, &token, &DELAY);
    let token_market = MockLendingMarketClient::new(&s.env, &s.env.register(MockLendingMarket, ()));
    token_market.initialize(&token, &s.reward);
    let mismatched = new_strategy(&s, &token_vault.address, &token, &token_market.address);
    s.vault.announce_strategy_update(&mismatched.address);
    s.env.ledger().set_timestamp(s.env.ledger().timestamp() + DELAY);
    assert_eq!(
        s.vault.try_set_strategy(&mismatched.address),
        Err(Ok(YieldError::UnderlyingMismatch))
    );
}

#[test]
fn test_strategy_swap_returns_all_capital() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let first = strategy(&s);
    activate(&s, &first.address);

    deposit(&s, &alice, 1_000 * UNIT);
    harvest(&s);
    assert_eq!(s.market.balance(&first.address), 1_000 * UNIT);
    assert_eq!(s.vault.underlying_balance_in_vault(), 0);

    let second = strategy(&s);
    s.vault.announce_strategy_update(&second.address);
    // capital stays put and counted while the swap is pending
    assert_eq!(s.vault.strategy(), Some(first.address.clone()));
    assert_eq!(s.vault.balance_with_investment(), 1_000 * UNIT);

    s.env.ledger().set_timestamp(s.env.ledger().timestamp() + DELAY);
    s.vault.set_strategy(&second.address);

    assert_eq!(first.invested_underlying_balance(), 0);
    assert_eq!(s.vault.underlying_balance_in_vault(), 1_000 * UNIT);
    assert_eq!(s.vault.get_price_per_full_share(), UNIT);

    harvest(&s);
    assert_eq!(second.invested_underlying_balance(), 1_000 * UNIT);
}

#[test]
fn test_cancel_strategy_update() {
    let s = setup();
    let first = strategy(&s);
    let second = strategy(&s);

    s.vault.announce_strategy_update(&first.address);
    s.vault.cancel_strategy_update();
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Empty);

    activate(&s, &first.address);
    s.vault.announce_strategy_update(&second.address);
    s.vault.cancel_strategy_update();
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(first.address.clone()));

    assert_eq!(
        s.vault.try_cancel_strategy_update(),
        Err(Ok(YieldError::NothingScheduled))
    );
}

// === Harvest ===

#[test]
fn test_harvest_without_strategy_is_noop() {
    let s = setup();
    let alice = Address::generate(&s.env);
    deposit(&s, &alice, 100 * UNIT);
    assert_eq!(harvest(&s), (UNIT, UNIT));
    assert_eq!(s.vault.available_to_invest_out(), 0);
}

#[test]
fn test_harvest_invests_fraction_and_raises_price() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let strategy = strategy(&s);
    activate(&s, &strategy.address);
    s.vault.set_vault_fraction_to_invest(&90, &100);

    deposit(&s, &alice, 1_000 * UNIT);
    assert_eq!(s.vault.available_to_invest_out(), 900 * UNIT);
    assert_eq!(harvest(&s), (UNIT, UNIT));
    assert_eq!(strategy.invested_underlying_balance(), 900 * UNIT);
    assert_eq!(s.vault.underlying_balance_in_vault(), 100 * UNIT);

    // 50 reward tokens liquidate into 100 underlying
    mint(&s.env, &s.reward, &s.market.address, 50 * UNIT);
    s.market.add_reward(&strategy.address, &(50 * UNIT));
    let (before, after) = harvest(&s);
    assert_eq!(before, UNIT);
    assert_eq!(after, 11 * UNIT / 10);
    assert!(invariants::price_non_decreasing(before, after));
}

#[test]
fn test_harvest_callers() {
    let s = setup();
    let keeper = Address::generate(&s.env);
    let stranger = Address::generate(&s.env);
    let strategy = strategy(&s);
    activate(&s, &strategy.address);

    assert_eq!(
        s.vault.try_harvest(&stranger),
        Err(Ok(YieldError::Unauthorized))
    );
    s.vault.harvest(&s.governance);

    s.controller.add_to_whitelist(&keeper);
    s.controller.harvest(&keeper, &s.vault.address);
    assert_eq!(
        s.controller.last_harvest(&s.vault.address),
        Some(s.env.ledger().timestamp())
    );
}

#[test]
fn test_invest_on_deposit() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let strategy = strategy(&s);
    activate(&s, &strategy.address);
    s.vault.set_invest_on_deposit(&true);

    deposit(&s, &alice, 500 * UNIT);
    assert_eq!(s.vault.underlying_balance_in_vault(), 0);
    // sent to the strategy, supplied on the next harvest
    assert_eq!(strategy.invested_underlying_balance(), 500 * UNIT);
}

#[test]
fn test_invest_ratio_validation() {
    let s = setup();
    assert_eq!(
        s.vault.try_set_vault_fraction_to_invest(&1, &0),
        Err(Ok(YieldError::InvalidRatio))
    );
    assert_eq!(
        s.vault.try_set_vault_fraction_to_invest(&101, &100),
        Err(Ok(YieldError::InvalidRatio))
    );
    s.vault.set_vault_fraction_to_invest(&0, &1);
    assert_eq!(
        s.vault.vault_fraction_to_invest(),
        InvestRatio {
            numerator: 0,
            denominator: 1
        }
    );
}

#[test]
fn test_rebalance() {
    let s = setup();
    let alice = Address::generate(&s.env);
    assert_eq!(s.vault.try_rebalance(), Err(Ok(YieldError::NoStrategy)));

    let strategy = strategy(&s);
    activate(&s, &strategy.address);
    s.vault.set_vault_fraction_to_invest(&50, &100);
    deposit(&s, &alice, 1_000 * UNIT);
    harvest(&s);
    assert_eq!(strategy.invested_underlying_balance(), 500 * UNIT);

    s.vault.set_vault_fraction_to_invest(&80, &100);
    assert_eq!(s.vault.rebalance(), 800 * UNIT);
    assert_eq!(s.vault.underlying_balance_in_vault(), 200 * UNIT);
}

// === Withdrawals through the strategy ===

#[test]
fn test_withdraw_pulls_missing_funds_from_strategy() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    let strategy = strategy(&s);
    activate(&s, &strategy.address);

    deposit(&s, &alice, 1_000 * UNIT);
    deposit(&s, &bob, 1_000 * UNIT);
    harvest(&s);
    assert_eq!(s.vault.underlying_balance_in_vault(), 0);

    assert_eq!(s.vault.withdraw(&alice, &(1_000 * UNIT)), 1_000 * UNIT);
    assert_eq!(strategy.invested_underlying_balance(), 1_000 * UNIT);

    // the last redemption empties the strategy, pending rewards included
    mint(&s.env, &s.reward, &s.market.address, 10 * UNIT);
    s.market.add_reward(&strategy.address, &(10 * UNIT));
    assert_eq!(s.vault.withdraw_all(&bob), 1_000 * UNIT);
    assert_eq!(strategy.invested_underlying_balance(), 0);
    assert_eq!(s.vault.total_supply(), 0);
    assert_eq!(s.vault.underlying_balance_in_vault(), 20 * UNIT);
}

// === Strategy upgrade ===

#[test]
fn test_strategy_upgrade_lifecycle() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let strategy = strategy(&s);
    let wasm = BytesN::from_array(&s.env, &[5u8; 32]);

    assert_eq!(
        s.vault.try_announce_strategy_upgrade(&wasm),
        Err(Ok(YieldError::NoStrategy))
    );
    activate(&s, &strategy.address);
    deposit(&s, &alice, 100 * UNIT);
    harvest(&s);

    let t = s.env.ledger().timestamp();
    assert_eq!(s.vault.announce_strategy_upgrade(&wasm), t + DELAY);
    assert_eq!(strategy.upgrade_schedule().unwrap().implementation, wasm);
    assert!(matches!(s.vault.strategy_slot(), StrategySlot::UpgradePending(_)));

    // no swaps or harvests while the upgrade is pending, but funds stay counted
    assert_eq!(
        s.vault.try_announce_strategy_update(&strategy.address),
        Err(Ok(YieldError::AlreadyScheduled))
    );
    assert_eq!(harvest(&s), (UNIT, UNIT));
    assert_eq!(s.vault.balance_with_investment(), 100 * UNIT);

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(
        s.vault.try_upgrade_strategy(),
        Err(Ok(YieldError::NotReady))
    );

    s.vault.cancel_strategy_upgrade();
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(strategy.address.clone()));
    assert_eq!(strategy.upgrade_schedule(), None);
    assert_eq!(
        s.vault.try_upgrade_strategy(),
        Err(Ok(YieldError::NothingScheduled))
    );
}

#[test]
fn test_strategy_upgrade_waits_for_vault_delay() {
    let s = setup();
    let wasm = BytesN::from_array(&s.env, &[6u8; 32]);
    let short = LendingStrategyClient::new(&s.env, &s.env.register(LendingStrategy, ()));
    let init = |delay: u64| {
        short.try_initialize(
            &s.storage.address,
            &s.vault.address,
            &s.underlying,
            &s.registry.address,
            &s.market.address,
            &vec![&s.env, s.reward.clone()],
            &symbol_short!("uniV3"),
            &delay,
        )
    };
    assert_eq!(init(0), Err(Ok(YieldError::InvalidConfig)));
    assert_eq!(init(HOUR), Ok(Ok(())));
    activate(&s, &short.address);

    let t = s.env.ledger().timestamp();
    assert_eq!(s.vault.announce_strategy_upgrade(&wasm), t + DELAY);
    assert_eq!(short.upgrade_schedule().unwrap().ready_at, t + HOUR);

    s.env.ledger().set_timestamp(t + HOUR);
    assert_eq!(
        s.vault.try_upgrade_strategy(),
        Err(Ok(YieldError::NotReady))
    );

    // the pending upgrade can only move through the vault
    assert_eq!(
        short.try_upgrade(&s.governance),
        Err(Ok(YieldError::Unauthorized))
    );
    assert_eq!(
        short.try_cancel_upgrade(&s.governance),
        Err(Ok(YieldError::Unauthorized))
    );
    s.vault.cancel_strategy_upgrade();
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(short.address.clone()));
}

#[test]
fn test_strategy_upgrade_routes_to_new_code() {
    let s = setup();
    let strategy = strategy(&s);
    activate(&s, &strategy.address);

    let wasm = s
        .env
        .deployer()
        .upload_contract_wasm(Bytes::from_slice(&s.env, VERSION_WASM));
    let t = s.env.ledger().timestamp();
    s.vault.announce_strategy_upgrade(&wasm);
    s.env.ledger().set_timestamp(t + DELAY);
    s.vault.upgrade_strategy();

    // same address, new implementation
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(strategy.address.clone()));
    let version: u32 = s.env.invoke_contract(
        &strategy.address,
        &Symbol::new(&s.env, "version"),
        Vec::new(&s.env),
    );
    assert_eq!(version, 7);
}

// === Vault self-upgrade ===

#[test]
fn test_vault_upgrade_waits_for_delay() {
    let s = setup();
    let t = s.env.ledger().timestamp();
    let wasm = BytesN::from_array(&s.env, &[8u8; 32]);

    assert_eq!(s.vault.try_upgrade(), Err(Ok(YieldError::NothingScheduled)));
    let schedule = s.vault.schedule_upgrade(&wasm);
    assert_eq!(schedule.ready_at, t + DELAY);
    assert_eq!(s.vault.next_implementation(), Some(schedule));

    s.env.ledger().set_timestamp(t + 12 * HOUR);
    assert_eq!(s.vault.try_upgrade(), Err(Ok(YieldError::NotReady)));

    s.vault.cancel_upgrade();
    assert_eq!(s.vault.next_implementation(), None);
    assert_eq!(
        s.vault.try_cancel_upgrade(),
        Err(Ok(YieldError::NothingScheduled))
    );
}

// === Governance through the timelock ===

#[test]
fn test_strategy_swap_through_timelock() {
    let s = setup();
    let admin = Address::generate(&s.env);
    let timelock = TimelockClient::new(&s.env, &s.env.register(Timelock, ()));
    timelock.initialize(&admin, &DELAY, &None);
    s.storage.set_governance(&timelock.address);

    let strategy = strategy(&s);
    let call = |function: &str| -> Vec<Call> {
        vec![
            &s.env,
            Call {
                target: s.vault.address.clone(),
                function: Symbol::new(&s.env, function),
                args: vec![&s.env, strategy.address.into_val(&s.env)],
                value: 0,
            },
        ]
    };
    let none = BytesN::from_array(&s.env, &[0u8; 32]);
    let salt = BytesN::from_array(&s.env, &[1u8; 32]);

    let t = s.env.ledger().timestamp();
    let announce = timelock.schedule(&admin, &call("announce_strategy_update"), &none, &salt, &DELAY);
    let commit = timelock.schedule(&admin, &call("set_strategy"), &announce, &salt, &(2 * DELAY));

    s.env.ledger().set_timestamp(t + DELAY);
    timelock.execute(&admin, &announce);
    assert!(matches!(s.vault.strategy_slot(), StrategySlot::AnnouncedPending(_)));

    s.env.ledger().set_timestamp(t + 2 * DELAY);
    timelock.execute(&admin, &commit);
    assert_eq!(s.vault.strategy_slot(), StrategySlot::Active(strategy.address.clone()));
}
