#![no_std]

//! Strategy supplying the vault's underlying to a lending market.
//!
//! Harvest claims the market's reward token, liquidates it into the
//! underlying through the liquidation registry and supplies the proceeds.

use soroban_sdk::{contract, contractimpl, contracttype, log, vec, Address, BytesN, Env, Symbol, Vec};
use strategy_base::{
    self as base, require_governance, require_vault, require_vault_or_governance, StrategyConfig,
};
use yield_types::{UpgradeSchedule, YieldError};

mod market;


#[contract]
pub struct LendingStrategy;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Market,
}

#[contractimpl]
impl LendingStrategy {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        storage: Address,
        vault: Address,
        underlying: Address,
        registry: Address,
        market: Address,
        reward_tokens: Vec<Address>,
        venue: Symbol,
        upgrade_delay: u64,
    ) -> Result<(), YieldError> {
        if market::underlying(&env, &market) != underlying {
            return Err(YieldError::UnderlyingMismatch);
        }
        let config = StrategyConfig {
            storage,
            vault,
            underlying,
            registry,
            venue,
            upgrade_delay,
        };
        base::init_config(&env, &config, &reward_tokens)?;
        env.storage().instance().set(&DataKey::Market, &market);

        env.events().publish(
            (Symbol::new(&env, "strategy_initialized"),),
            (config.vault, market),
        );
        Ok(())
    }

    // === Views ===

    pub fn underlying(env: Env) -> Result<Address, YieldError> {
        Ok(base::load_config(&env)?.underlying)
    }

    pub fn vault(env: Env) -> Result<Address, YieldError> {
        Ok(base::load_config(&env)?.vault)
    }

    pub fn market(env: Env) -> Result<Address, YieldError> {
        get_market(&env)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        base::reward_tokens(&env)
    }

    /// Idle underlying plus everything supplied to the market
    pub fn invested_underlying_balance(env: Env) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        let market = get_market(&env)?;
        Ok(base::balance(&env, &config.underlying) + market::supplied(&env, &market))
    }

    pub fn upgrade_schedule(env: Env) -> Option<UpgradeSchedule> {
        base::upgrade_schedule(&env)
    }

    /// Pre-paid rewards reported by the source but not yet by a harvest
    pub fn pending_prepaid_reward(env: Env) -> i128 {
        base::prepaid_accrued(&env) - base::prepaid_reported(&env)
    }

    // === Vault entry points ===

    /// Claim and liquidate rewards, then supply every idle unit.
    /// Returns the underlying obtained from rewards.
    pub fn do_hard_work(env: Env, caller: Address) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault(&config, &caller)?;
        let market = get_market(&env)?;

        let claimed = market::claim(&env, &market);
        let obtained = base::liquidate_rewards(&env, &config, &config.underlying)?;
        let prepaid = base::take_prepaid_delta(&env);
        let supplied = invest_all(&env, &config, &market);

        log!(&env, "lending harvest", claimed, obtained, supplied);
        env.events().publish(
            (Symbol::new(&env, "harvest"), env.current_contract_address()),
            (obtained, prepaid),
        );
        Ok(obtained)
    }

    /// Return `amount` of underlying to the vault, unwinding market supply
    /// only for the part not already idle
    pub fn withdraw_to_vault(env: Env, caller: Address, amount: i128) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault_or_governance(&env, &config, &caller)?;
        if amount <= 0 {
            return Err(YieldError::InvalidAmount);
        }

        let idle = base::balance(&env, &config.underlying);
        if idle < amount {
            let market = get_market(&env)?;
            let missing = (amount - idle).min(market::supplied(&env, &market));
            market::withdraw(&env, &market, missing);
        }

        let sent = amount.min(base::balance(&env, &config.underlying));
        base::transfer(&env, &config.underlying, &config.vault, sent);
        env.events()
            .publish((Symbol::new(&env, "withdraw_to_vault"),), sent);
        Ok(sent)
    }

    /// Exit the market completely. Outside an emergency pending rewards are
    /// liquidated first so they reach the vault too.
    pub fn withdraw_all_to_vault(env: Env, caller: Address, emergency: bool) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault_or_governance(&env, &config, &caller)?;
        let market = get_market(&env)?;

        if !emergency {
            market::claim(&env, &market);
            base::liquidate_rewards(&env, &config, &config.underlying)?;
        }
        let supplied = market::supplied(&env, &market);
        if supplied > 0 {
            market::withdraw(&env, &market, supplied);
        }

        let sent = base::balance(&env, &config.underlying);
        base::transfer(&env, &config.underlying, &config.vault, sent);
        env.events()
            .publish((Symbol::new(&env, "withdraw_all_to_vault"),), (sent, emergency));
        Ok(sent)
    }

    // === Upgrade lifecycle ===
    // Driven by the vault only, so its strategy slot stays in step

    pub fn schedule_upgrade(env: Env, caller: Address, implementation: BytesN<32>) -> Result<UpgradeSchedule, YieldError> {
        let config = base::load_config(&env)?;
        require_vault(&config, &caller)?;
        base::schedule_upgrade(&env, implementation)
    }

    pub fn upgrade(env: Env, caller: Address) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_vault(&config, &caller)?;
        base::upgrade(&env)?;
        Ok(())
    }

    pub fn cancel_upgrade(env: Env, caller: Address) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_vault(&config, &caller)?;
        base::cancel_upgrade(&env)
    }

    // === Governance ===

    pub fn set_reward_tokens(env: Env, caller: Address, tokens: Vec<Address>) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        base::set_reward_tokens(&env, &tokens);
        Ok(())
    }

    pub fn set_venue(env: Env, caller: Address, venue: Symbol) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        base::set_venue(&env, venue)
    }

    pub fn set_prepay_source(env: Env, caller: Address, source: Address) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        base::set_prepay_source(&env, &source);
        Ok(())
    }

    /// Called by the pre-pay source with its cumulative prepaid total
    pub fn report_prepaid_reward(env: Env, caller: Address, cumulative: i128) -> Result<(), YieldError> {
        base::report_prepaid(&env, &caller, cumulative)
    }

    pub fn salvage(env: Env, caller: Address, recipient: Address, token: Address, amount: i128) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        base::salvage(&env, &vec![&env, config.underlying], &recipient, &token, amount)
    }
}

fn get_market(env: &Env) -> Result<Address, YieldError> {
    env.storage()
        .instance()
        .get(&DataKey::Market)
        .ok_or(YieldError::NotInitialized)
}

fn invest_all(env: &Env, config: &StrategyConfig, market: &Address) -> i128 {
    let idle = base::balance(env, &config.underlying);
    if idle > 0 {
        base::authorize_transfers(env, &[(config.underlying.clone(), market.clone(), idle)]);
        market::supply(env, market, idle);
    }
    idle
}
