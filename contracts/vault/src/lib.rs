#![no_std]

//! Vault pooling deposits of one underlying token.
//!
//! Depositors receive shares priced against everything the vault controls:
//! the idle balance plus whatever the strategy reports as invested. The
//! strategy is swapped or upgraded only through announce-then-commit with
//! `min_delay` in between, and governance is read from ProtocolStorage.

use soroban_sdk::{contract, contractimpl, log, token, Address, BytesN, Env, IntoVal, Symbol};
use storage::VaultConfig;
use yield_math::{available_to_invest, price_per_full_share, shares_for_deposit, underlying_for_shares, underlying_unit};
use yield_types::{InvestRatio, StrategySlot, UpgradeSchedule, YieldError, DEFAULT_MIN_DELAY};

mod invariants;
mod slot;
mod storage;
mod strategy;

#[cfg(feature = "certora")]
mod certora_specs;

#[cfg(test)]
mod test;

#[contract]
pub struct Vault;

#[contractimpl]
impl Vault {
    /// A `min_delay` of zero selects the 12 hour default
    pub fn initialize(env: Env, storage: Address, underlying: Address, min_delay: u64) -> Result<(), YieldError> {
        if storage::has_config(&env) {
            return Err(YieldError::AlreadyInitialized);
        }
        let decimals = token::Client::new(&env, &underlying).decimals();
        let config = VaultConfig {
            storage,
            underlying,
            unit: underlying_unit(decimals),
            min_delay: if min_delay == 0 { DEFAULT_MIN_DELAY } else { min_delay },
        };
        storage::set_config(&env, &config);
        storage::set_slot(&env, &StrategySlot::Empty);
        storage::set_invest_ratio(&env, &InvestRatio::full());

        env.events().publish(
            (Symbol::new(&env, "vault_initialized"),),
            (config.underlying, config.min_delay),
        );
        Ok(())
    }

    // === Depositor entry points ===

    /// Pull `amount` from `from` and mint shares to `beneficiary`.
    /// Shares are priced with the totals from before the transfer.
    pub fn deposit(env: Env, from: Address, amount: i128, beneficiary: Address) -> Result<i128, YieldError> {
        from.require_auth();
        if amount <= 0 {
            return Err(YieldError::InvalidAmount);
        }
        let config = storage::get_config(&env)?;
        let me = env.current_contract_address();
        let underlying = token::Client::new(&env, &config.underlying);

        if underlying.allowance(&from, &me) < amount {
            return Err(YieldError::InsufficientAllowance);
        }
        if underlying.balance(&from) < amount {
            return Err(YieldError::TransferFailed);
        }

        let supply = storage::get_total_supply(&env);
        let total = total_underlying(&env, &config);
        if supply > 0 && total <= 0 {
            return Err(YieldError::InvalidAmount);
        }
        let shares = shares_for_deposit(&env, amount, supply, total);
        if shares <= 0 {
            return Err(YieldError::InvalidAmount);
        }
        debug_assert!(invariants::deposit_keeps_price(&env, config.unit, amount, supply, total));

        underlying.transfer_from(&me, &from, &me, &amount);
        storage::mint_shares(&env, &beneficiary, shares);

        env.events().publish(
            (Symbol::new(&env, "deposit"), from, beneficiary),
            (amount, shares),
        );

        if storage::get_invest_on_deposit(&env) {
            if let Some(active) = storage::get_slot(&env).active() {
                invest(&env, &config, &active);
            }
        }
        Ok(shares)
    }

    /// Burn `shares` of `owner` and pay out their claim on the vault.
    /// Missing liquidity is pulled back from the strategy first.
    pub fn withdraw(env: Env, owner: Address, shares: i128) -> Result<i128, YieldError> {
        owner.require_auth();
        redeem(&env, &owner, shares)
    }

    pub fn withdraw_all(env: Env, owner: Address) -> Result<i128, YieldError> {
        owner.require_auth();
        let shares = storage::get_balance(&env, &owner);
        redeem(&env, &owner, shares)
    }

    pub fn transfer(env: Env, from: Address, to: Address, shares: i128) -> Result<(), YieldError> {
        from.require_auth();
        if shares <= 0 {
            return Err(YieldError::InvalidAmount);
        }
        storage::move_shares(&env, &from, &to, shares)?;
        env.events()
            .publish((Symbol::new(&env, "transfer"), from, to), shares);
        Ok(())
    }

    // === Harvest ===

    /// Invest the available fraction and let the strategy harvest.
    /// Returns the share price before and after.
    pub fn harvest(env: Env, caller: Address) -> Result<(i128, i128), YieldError> {
        let config = storage::get_config(&env)?;
        let controller: Address = env.invoke_contract(
            &config.storage,
            &Symbol::new(&env, "controller"),
            ().into_val(&env),
        );
        if caller != controller && caller != governance(&env, &config) {
            return Err(YieldError::Unauthorized);
        }
        caller.require_auth();

        let before = share_price(&env, &config);
        let Some(active) = storage::get_slot(&env).active() else {
            return Ok((before, before));
        };

        let invested = invest(&env, &config, &active);
        let obtained = strategy::do_hard_work(&env, &active);
        let after = share_price(&env, &config);

        log!(&env, "vault harvest", invested, obtained, before, after);
        env.events()
            .publish((Symbol::new(&env, "harvest"), active), (before, after));
        Ok((before, after))
    }

    // === Strategy swap ===

    pub fn announce_strategy_update(env: Env, new_strategy: Address) -> Result<u64, YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);

        let slot = slot::announce(
            &storage::get_slot(&env),
            new_strategy.clone(),
            env.ledger().timestamp(),
            config.min_delay,
        )?;
        storage::set_slot(&env, &slot);

        let ready_at = match &slot {
            StrategySlot::AnnouncedPending(pending) => pending.ready_at,
            _ => 0,
        };
        env.events().publish(
            (Symbol::new(&env, "strategy_announced"), new_strategy),
            ready_at,
        );
        Ok(ready_at)
    }

    /// Commit the announced strategy once the delay has passed. The
    /// previous strategy is emptied into the vault before the switch.
    pub fn set_strategy(env: Env, new_strategy: Address) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);

        let pending = slot::commit(&storage::get_slot(&env), &new_strategy, env.ledger().timestamp())?;
        if strategy::underlying(&env, &new_strategy) != config.underlying {
            return Err(YieldError::UnderlyingMismatch);
        }
        if strategy::vault(&env, &new_strategy) != env.current_contract_address() {
            return Err(YieldError::StrategyMismatch);
        }

        let mut recovered = 0i128;
        if let Some(previous) = &pending.current {
            recovered = strategy::withdraw_all_to_vault(&env, previous);
        }
        storage::set_slot(&env, &StrategySlot::Active(new_strategy.clone()));

        log!(&env, "strategy changed", pending.current, new_strategy, recovered);
        env.events().publish(
            (Symbol::new(&env, "strategy_changed"), new_strategy),
            (pending.current, recovered),
        );
        Ok(())
    }

    pub fn cancel_strategy_update(env: Env) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        let slot = slot::cancel_announcement(&storage::get_slot(&env))?;
        storage::set_slot(&env, &slot);
        env.events()
            .publish((Symbol::new(&env, "strategy_update_cancelled"),), ());
        Ok(())
    }

    // === Strategy upgrade ===

    pub fn announce_strategy_upgrade(env: Env, implementation: BytesN<32>) -> Result<u64, YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);

        let active = slot::upgradable(&storage::get_slot(&env))?;
        let schedule = strategy::schedule_upgrade(&env, &active, &implementation);
        let upgrading = slot::begin_upgrade(
            active.clone(),
            implementation,
            schedule.ready_at,
            env.ledger().timestamp(),
            config.min_delay,
        );
        let ready_at = slot::pending_upgrade(&upgrading)?.ready_at;
        storage::set_slot(&env, &upgrading);

        env.events().publish(
            (Symbol::new(&env, "strategy_upgrade_announced"), active),
            ready_at,
        );
        Ok(ready_at)
    }

    pub fn upgrade_strategy(env: Env) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);

        let pending = slot::finish_upgrade(&storage::get_slot(&env), env.ledger().timestamp())?;
        strategy::upgrade(&env, &pending.strategy);
        storage::set_slot(&env, &StrategySlot::Active(pending.strategy.clone()));

        log!(&env, "strategy upgraded", pending.strategy);
        env.events().publish(
            (Symbol::new(&env, "strategy_upgraded"), pending.strategy),
            pending.implementation,
        );
        Ok(())
    }

    pub fn cancel_strategy_upgrade(env: Env) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);

        let pending = slot::pending_upgrade(&storage::get_slot(&env))?;
        strategy::cancel_upgrade(&env, &pending.strategy);
        storage::set_slot(&env, &StrategySlot::Active(pending.strategy.clone()));
        env.events().publish(
            (Symbol::new(&env, "strategy_upgrade_cancelled"), pending.strategy),
            (),
        );
        Ok(())
    }

    // === Investment settings ===

    pub fn set_vault_fraction_to_invest(env: Env, numerator: u32, denominator: u32) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        let ratio = InvestRatio::new(numerator, denominator)?;
        storage::set_invest_ratio(&env, &ratio);
        env.events().publish(
            (Symbol::new(&env, "invest_ratio_set"),),
            (numerator, denominator),
        );
        Ok(())
    }

    pub fn set_invest_on_deposit(env: Env, enabled: bool) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        storage::set_invest_on_deposit(&env, enabled);
        env.events()
            .publish((Symbol::new(&env, "invest_on_deposit_set"),), enabled);
        Ok(())
    }

    /// Pull everything back from the strategy, then re-invest the fraction
    pub fn rebalance(env: Env) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        let active = storage::get_slot(&env)
            .active()
            .ok_or(YieldError::NoStrategy)?;

        strategy::withdraw_all_to_vault(&env, &active);
        let invested = invest(&env, &config, &active);
        env.events()
            .publish((Symbol::new(&env, "rebalance"), active), invested);
        Ok(invested)
    }

    // === Vault self-upgrade ===

    pub fn schedule_upgrade(env: Env, wasm_hash: BytesN<32>) -> Result<UpgradeSchedule, YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        let schedule = UpgradeSchedule::new(wasm_hash, env.ledger().timestamp(), config.min_delay);
        storage::set_upgrade(&env, &schedule);
        env.events().publish(
            (Symbol::new(&env, "upgrade_scheduled"),),
            (schedule.implementation.clone(), schedule.ready_at),
        );
        Ok(schedule)
    }

    pub fn upgrade(env: Env) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        let schedule = storage::get_upgrade(&env).ok_or(YieldError::NothingScheduled)?;
        let wasm_hash = schedule.take_if_ready(env.ledger().timestamp())?;

        storage::clear_upgrade(&env);
        env.events()
            .publish((Symbol::new(&env, "upgraded"),), wasm_hash.clone());
        env.deployer().update_current_contract_wasm(wasm_hash);
        Ok(())
    }

    pub fn cancel_upgrade(env: Env) -> Result<(), YieldError> {
        let config = storage::get_config(&env)?;
        require_governance(&env, &config);
        if storage::get_upgrade(&env).is_none() {
            return Err(YieldError::NothingScheduled);
        }
        storage::clear_upgrade(&env);
        env.events()
            .publish((Symbol::new(&env, "upgrade_cancelled"),), ());
        Ok(())
    }

    pub fn next_implementation(env: Env) -> Option<UpgradeSchedule> {
        storage::get_upgrade(&env)
    }

    // === Views ===

    pub fn underlying(env: Env) -> Result<Address, YieldError> {
        Ok(storage::get_config(&env)?.underlying)
    }

    /// Strategy currently holding the vault's capital
    pub fn strategy(env: Env) -> Option<Address> {
        storage::get_slot(&env).holder()
    }

    pub fn strategy_slot(env: Env) -> StrategySlot {
        storage::get_slot(&env)
    }

    pub fn balance_of(env: Env, holder: Address) -> i128 {
        storage::get_balance(&env, &holder)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    pub fn underlying_unit(env: Env) -> Result<i128, YieldError> {
        Ok(storage::get_config(&env)?.unit)
    }

    pub fn min_delay(env: Env) -> Result<u64, YieldError> {
        Ok(storage::get_config(&env)?.min_delay)
    }

    pub fn underlying_balance_in_vault(env: Env) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        Ok(idle_balance(&env, &config))
    }

    pub fn balance_with_investment(env: Env) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        Ok(total_underlying(&env, &config))
    }

    pub fn holder_balance_with_investment(env: Env, holder: Address) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        let supply = storage::get_total_supply(&env);
        if supply == 0 {
            return Ok(0);
        }
        let shares = storage::get_balance(&env, &holder);
        Ok(underlying_for_shares(&env, shares, supply, total_underlying(&env, &config)))
    }

    pub fn get_price_per_full_share(env: Env) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        Ok(share_price(&env, &config))
    }

    pub fn available_to_invest_out(env: Env) -> Result<i128, YieldError> {
        let config = storage::get_config(&env)?;
        Ok(investable(&env, &config, storage::get_slot(&env).active().as_ref()))
    }

    pub fn vault_fraction_to_invest(env: Env) -> InvestRatio {
        storage::get_invest_ratio(&env)
    }

    pub fn invest_on_deposit(env: Env) -> bool {
        storage::get_invest_on_deposit(&env)
    }
}

fn governance(env: &Env, config: &VaultConfig) -> Address {
    env.invoke_contract(
        &config.storage,
        &Symbol::new(env, "governance"),
        ().into_val(env),
    )
}

fn require_governance(env: &Env, config: &VaultConfig) {
    governance(env, config).require_auth();
}

fn idle_balance(env: &Env, config: &VaultConfig) -> i128 {
    token::Client::new(env, &config.underlying).balance(&env.current_contract_address())
}

fn invested_balance(env: &Env) -> i128 {
    storage::get_slot(env)
        .holder()
        .map(|holder| strategy::invested_underlying_balance(env, &holder))
        .unwrap_or(0)
}

fn total_underlying(env: &Env, config: &VaultConfig) -> i128 {
    idle_balance(env, config) + invested_balance(env)
}

fn share_price(env: &Env, config: &VaultConfig) -> i128 {
    price_per_full_share(
        env,
        config.unit,
        storage::get_total_supply(env),
        total_underlying(env, config),
    )
}

fn investable(env: &Env, config: &VaultConfig, active: Option<&Address>) -> i128 {
    if active.is_none() {
        return 0;
    }
    let ratio = storage::get_invest_ratio(env);
    let idle = idle_balance(env, config);
    let invested = invested_balance(env);
    available_to_invest(env, idle + invested, invested, idle, ratio.numerator, ratio.denominator)
}

/// Push the investable amount to `active`; returns what was sent
fn invest(env: &Env, config: &VaultConfig, active: &Address) -> i128 {
    let amount = investable(env, config, Some(active));
    if amount > 0 {
        token::Client::new(env, &config.underlying).transfer(
            &env.current_contract_address(),
            active,
            &amount,
        );
        env.events()
            .publish((Symbol::new(env, "invest"), active.clone()), amount);
    }
    amount
}

fn redeem(env: &Env, owner: &Address, shares: i128) -> Result<i128, YieldError> {
    if shares <= 0 {
        return Err(YieldError::InvalidAmount);
    }
    let config = storage::get_config(env)?;
    if shares > storage::get_balance(env, owner) {
        return Err(YieldError::InsufficientShares);
    }

    let supply = storage::get_total_supply(env);
    let total = total_underlying(env, &config);
    let claim = underlying_for_shares(env, shares, supply, total);
    debug_assert!(invariants::claim_bounded(claim, shares, supply, total));
    storage::burn_shares(env, owner, shares)?;

    let idle = idle_balance(env, &config);
    if idle < claim {
        if let Some(holder) = storage::get_slot(env).holder() {
            if shares == supply {
                strategy::withdraw_all_to_vault(env, &holder);
            } else {
                strategy::withdraw_to_vault(env, &holder, claim - idle);
            }
        }
    }

    let paid = claim.min(idle_balance(env, &config));
    token::Client::new(env, &config.underlying).transfer(
        &env.current_contract_address(),
        owner,
        &paid,
    );

    env.events()
        .publish((Symbol::new(env, "withdraw"), owner.clone()), (shares, paid));
    Ok(paid)
}
