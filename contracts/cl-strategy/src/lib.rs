#![no_std]

//! Strategy providing the vault's underlying as concentrated liquidity.
//!
//! The strategy owns at most one position in a single pool. Harvest
//! collects trading fees and liquidates rewards, swaps idle funds to the
//! token split of the current range and adds them as liquidity. Once the
//! price leaves the range nothing is reinvested until governance calls
//! `rebalance`, which recentres the position on the current tick.

use soroban_sdk::{contract, contractimpl, log, vec, Address, BytesN, Env, Symbol, Vec};
use strategy_base::{
    self as base, require_governance, require_vault, require_vault_or_governance, StrategyConfig,
};
use yield_math::{centered_range, from_amount, in_range, needs_rebalance, to_amount, token_weights, value_in_token0, value_in_token1};
use yield_types::{UpgradeSchedule, YieldError};

mod external;
mod position;


pub use position::PoolConfig;
use position::{load_pool, store_pool};

#[contract]
pub struct ClStrategy;

#[contractimpl]
impl ClStrategy {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        storage: Address,
        vault: Address,
        underlying: Address,
        registry: Address,
        pool: Address,
        position_manager: Address,
        target_width: u32,
        reward_tokens: Vec<Address>,
        venue: Symbol,
        upgrade_delay: u64,
    ) -> Result<(), YieldError> {
        let token0 = external::pool_token(&env, &pool, "token0");
        let token1 = external::pool_token(&env, &pool, "token1");
        if underlying != token0 && underlying != token1 {
            return Err(YieldError::UnderlyingMismatch);
        }
        if target_width == 0 {
            return Err(YieldError::InvalidConfig);
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

        let pool_config = PoolConfig {
            fee: external::pool_fee(&env, &pool),
            tick_spacing: external::pool_tick_spacing(&env, &pool),
            pool,
            position_manager,
            token0,
            token1,
            target_width,
        };
        store_pool(&env, &pool_config);

        env.events().publish(
            (Symbol::new(&env, "strategy_initialized"),),
            (config.vault, pool_config.pool),
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

    pub fn pool_config(env: Env) -> Result<PoolConfig, YieldError> {
        load_pool(&env)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        base::reward_tokens(&env)
    }

    pub fn get_current_tick(env: Env) -> Result<i32, YieldError> {
        Ok(external::pool_tick(&env, &load_pool(&env)?.pool))
    }

    pub fn get_sqrt_price_x96(env: Env) -> Result<u128, YieldError> {
        Ok(external::pool_sqrt_price(&env, &load_pool(&env)?.pool))
    }

    pub fn position_id(env: Env) -> Option<u32> {
        position::position_id(&env)
    }

    pub fn tick_range(env: Env) -> Result<Option<(i32, i32)>, YieldError> {
        let pool = load_pool(&env)?;
        Ok(position::current_position(&env, &pool).map(|(_, p)| (p.tick_lower, p.tick_upper)))
    }

    /// False while no position is open
    pub fn in_range(env: Env) -> Result<bool, YieldError> {
        let pool = load_pool(&env)?;
        Ok(match position::current_position(&env, &pool) {
            Some((_, p)) => in_range(external::pool_tick(&env, &pool.pool), p.tick_lower, p.tick_upper),
            None => false,
        })
    }

    pub fn get_current_token_amounts(env: Env) -> Result<(u128, u128), YieldError> {
        Ok(position::liquidity_amounts(&env, &load_pool(&env)?))
    }

    pub fn get_current_token_weights(env: Env) -> Result<(u128, u128), YieldError> {
        let pool = load_pool(&env)?;
        let (amount0, amount1) = position::liquidity_amounts(&env, &pool);
        Ok(token_weights(&env, amount0, amount1, external::pool_sqrt_price(&env, &pool.pool)))
    }

    pub fn get_position_value_in0(env: Env) -> Result<u128, YieldError> {
        let pool = load_pool(&env)?;
        let (amount0, amount1) = position::liquidity_amounts(&env, &pool);
        Ok(value_in_token0(&env, amount0, amount1, external::pool_sqrt_price(&env, &pool.pool)))
    }

    pub fn get_position_value_in1(env: Env) -> Result<u128, YieldError> {
        let pool = load_pool(&env)?;
        let (amount0, amount1) = position::liquidity_amounts(&env, &pool);
        Ok(value_in_token1(&env, amount0, amount1, external::pool_sqrt_price(&env, &pool.pool)))
    }

    pub fn target_width(env: Env) -> Result<u32, YieldError> {
        Ok(load_pool(&env)?.target_width)
    }

    /// Position, uncollected and idle pool tokens valued in the underlying
    pub fn invested_underlying_balance(env: Env) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        let pool = load_pool(&env)?;
        let (amount0, amount1) = position::holdings(&env, &pool);
        Ok(to_amount(position::value_in_underlying(&env, &config, &pool, amount0, amount1)))
    }

    pub fn upgrade_schedule(env: Env) -> Option<UpgradeSchedule> {
        base::upgrade_schedule(&env)
    }

    pub fn pending_prepaid_reward(env: Env) -> i128 {
        base::prepaid_accrued(&env) - base::prepaid_reported(&env)
    }

    // === Vault entry points ===

    /// Collect fees, liquidate rewards and reinvest while in range.
    /// Returns the underlying obtained from rewards.
    pub fn do_hard_work(env: Env, caller: Address) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault(&config, &caller)?;
        let pool = load_pool(&env)?;

        let (fees0, fees1) = position::collect(&env, &pool);
        let obtained = base::liquidate_rewards(&env, &config, &config.underlying)?;
        let prepaid = base::take_prepaid_delta(&env);
        let added = invest_idle(&env, &config, &pool)?;

        log!(&env, "cl harvest", fees0, fees1, obtained, added);
        env.events().publish(
            (Symbol::new(&env, "harvest"), env.current_contract_address()),
            (obtained, prepaid),
        );
        Ok(obtained)
    }

    /// Return `amount` of underlying to the vault. Liquidity is removed in
    /// proportion to the shortfall and the other pool token is swapped back.
    pub fn withdraw_to_vault(env: Env, caller: Address, amount: i128) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault_or_governance(&env, &config, &caller)?;
        if amount <= 0 {
            return Err(YieldError::InvalidAmount);
        }
        let pool = load_pool(&env)?;

        let idle = base::balance(&env, &config.underlying);
        if idle < amount {
            position::release_value(&env, &config, &pool, from_amount(amount - idle))?;
            position::convert_to_underlying(&env, &config, &pool)?;
        }

        let sent = amount.min(base::balance(&env, &config.underlying));
        base::transfer(&env, &config.underlying, &config.vault, sent);
        env.events()
            .publish((Symbol::new(&env, "withdraw_to_vault"),), sent);
        Ok(sent)
    }

    /// Close the position and send everything to the vault as underlying.
    /// An emergency exit skips reward liquidation.
    pub fn withdraw_all_to_vault(env: Env, caller: Address, emergency: bool) -> Result<i128, YieldError> {
        let config = base::load_config(&env)?;
        require_vault_or_governance(&env, &config, &caller)?;
        let pool = load_pool(&env)?;

        position::close(&env, &pool);
        if !emergency {
            base::liquidate_rewards(&env, &config, &config.underlying)?;
        }
        position::convert_to_underlying(&env, &config, &pool)?;

        let sent = base::balance(&env, &config.underlying);
        base::transfer(&env, &config.underlying, &config.vault, sent);
        env.events()
            .publish((Symbol::new(&env, "withdraw_all_to_vault"),), (sent, emergency));
        Ok(sent)
    }

    /// Recentre an out-of-range position on the current tick
    pub fn rebalance(env: Env, caller: Address) -> Result<(i32, i32), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        let pool = load_pool(&env)?;

        let tick = external::pool_tick(&env, &pool.pool);
        let (_, current) =
            position::current_position(&env, &pool).ok_or(YieldError::RebalanceNotNeeded)?;
        if !needs_rebalance(tick, current.tick_lower, current.tick_upper) {
            return Err(YieldError::RebalanceNotNeeded);
        }

        let (tick_lower, tick_upper) = centered_range(tick, pool.target_width, pool.tick_spacing)?;
        position::close(&env, &pool);
        position::match_target_weights(&env, &config, &pool, tick_lower, tick_upper)?;
        position::deposit_idle(&env, &pool, tick_lower, tick_upper)?;

        env.events().publish(
            (Symbol::new(&env, "rebalanced"),),
            (current.tick_lower, current.tick_upper, tick_lower, tick_upper),
        );
        Ok((tick_lower, tick_upper))
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

    /// Width applies to the next range; the open position is untouched
    pub fn set_target_width(env: Env, caller: Address, target_width: u32) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        if target_width == 0 {
            return Err(YieldError::InvalidConfig);
        }
        let mut pool = load_pool(&env)?;
        pool.target_width = target_width;
        store_pool(&env, &pool);
        env.events()
            .publish((Symbol::new(&env, "target_width_set"),), target_width);
        Ok(())
    }

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

    pub fn report_prepaid_reward(env: Env, caller: Address, cumulative: i128) -> Result<(), YieldError> {
        base::report_prepaid(&env, &caller, cumulative)
    }

    pub fn salvage(env: Env, caller: Address, recipient: Address, token: Address, amount: i128) -> Result<(), YieldError> {
        let config = base::load_config(&env)?;
        require_governance(&env, &config, &caller)?;
        let pool = load_pool(&env)?;
        base::salvage(&env, &vec![&env, pool.token0, pool.token1], &recipient, &token, amount)
    }
}

/// Reinvest idle funds into the current range, minting one if none is open
fn invest_idle(env: &Env, config: &StrategyConfig, pool: &PoolConfig) -> Result<u128, YieldError> {
    let tick = external::pool_tick(env, &pool.pool);
    let (tick_lower, tick_upper) = match position::current_position(env, pool) {
        Some((_, p)) => {
            if !in_range(tick, p.tick_lower, p.tick_upper) {
                log!(env, "position out of range, skipping reinvest", tick);
                return Ok(0);
            }
            (p.tick_lower, p.tick_upper)
        }
        None => centered_range(tick, pool.target_width, pool.tick_spacing)?,
    };

    position::match_target_weights(env, config, pool, tick_lower, tick_upper)?;
    position::deposit_idle(env, pool, tick_lower, tick_upper)
}
