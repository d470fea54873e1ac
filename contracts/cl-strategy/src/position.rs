//! Lifecycle of the single liquidity position the strategy owns.

use crate::external;
use soroban_sdk::{contracttype, Address, Env, Symbol};
use strategy_base::{self as base, StrategyConfig};
use yield_math::{
    from_amount, get_amounts_for_liquidity, get_liquidity_for_amounts, get_sqrt_ratio_at_tick,
    mul_div, mul_div_rounding_up, target_weights, to_amount, token0_in_token1, token1_in_token0,
    token_amounts, value_in_token0, value_in_token1,
};
use yield_types::{IncreaseLiquidityParams, MintParams, PositionData, YieldError, WEIGHT_SCALE};

/// Pool wiring fixed at initialization, plus the width used for new ranges
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub pool: Address,
    pub position_manager: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub target_width: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    PoolConfig,
    PositionId,
}

pub fn load_pool(env: &Env) -> Result<PoolConfig, YieldError> {
    env.storage()
        .instance()
        .get(&DataKey::PoolConfig)
        .ok_or(YieldError::NotInitialized)
}

pub fn store_pool(env: &Env, pool: &PoolConfig) {
    env.storage().instance().set(&DataKey::PoolConfig, pool);
}

pub fn position_id(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::PositionId)
}

pub fn current_position(env: &Env, pool: &PoolConfig) -> Option<(u32, PositionData)> {
    position_id(env).map(|id| (id, external::get_position(env, &pool.position_manager, id)))
}

/// Token amounts backing the position's liquidity, fees excluded
pub fn liquidity_amounts(env: &Env, pool: &PoolConfig) -> (u128, u128) {
    match current_position(env, pool) {
        Some((_, position)) => token_amounts(
            env,
            external::pool_sqrt_price(env, &pool.pool),
            position.tick_lower,
            position.tick_upper,
            position.liquidity,
        ),
        None => (0, 0),
    }
}

/// Everything the strategy can turn into tokens: liquidity, uncollected
/// tokens in the manager and idle balances
pub fn holdings(env: &Env, pool: &PoolConfig) -> (u128, u128) {
    let (mut amount0, mut amount1) = liquidity_amounts(env, pool);
    if let Some((_, position)) = current_position(env, pool) {
        amount0 += position.tokens_owed_0;
        amount1 += position.tokens_owed_1;
    }
    amount0 += from_amount(base::balance(env, &pool.token0));
    amount1 += from_amount(base::balance(env, &pool.token1));
    (amount0, amount1)
}

/// Value `(amount0, amount1)` in whichever pool token is the underlying
pub fn value_in_underlying(env: &Env, config: &StrategyConfig, pool: &PoolConfig, amount0: u128, amount1: u128) -> u128 {
    let sqrt_price = external::pool_sqrt_price(env, &pool.pool);
    if config.underlying == pool.token0 {
        value_in_token0(env, amount0, amount1, sqrt_price)
    } else {
        value_in_token1(env, amount0, amount1, sqrt_price)
    }
}

/// Swap idle token0/token1 so their value split matches what a deposit
/// into `[tick_lower, tick_upper]` consumes at the current price
pub fn match_target_weights(
    env: &Env,
    config: &StrategyConfig,
    pool: &PoolConfig,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<(), YieldError> {
    let sqrt_price = external::pool_sqrt_price(env, &pool.pool);
    let balance0 = from_amount(base::balance(env, &pool.token0));
    let balance1 = from_amount(base::balance(env, &pool.token1));
    let total = value_in_token1(env, balance0, balance1, sqrt_price);
    if total == 0 {
        return Ok(());
    }

    let (weight0, _) = target_weights(env, sqrt_price, tick_lower, tick_upper);
    let wanted0 = mul_div(env, total, weight0, WEIGHT_SCALE);
    let held0 = token0_in_token1(env, balance0, sqrt_price);

    if held0 > wanted0 {
        let sell = token1_in_token0(env, held0 - wanted0, sqrt_price).min(balance0);
        base::swap_tokens(env, config, &pool.token0, &pool.token1, to_amount(sell))?;
    } else if wanted0 > held0 {
        let sell = (wanted0 - held0).min(balance1);
        base::swap_tokens(env, config, &pool.token1, &pool.token0, to_amount(sell))?;
    }
    Ok(())
}

/// Put idle token0/token1 into the position, minting it on first use.
/// Returns the liquidity added.
pub fn deposit_idle(env: &Env, pool: &PoolConfig, tick_lower: i32, tick_upper: i32) -> Result<u128, YieldError> {
    let sqrt_price = external::pool_sqrt_price(env, &pool.pool);
    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);
    let balance0 = base::balance(env, &pool.token0);
    let balance1 = base::balance(env, &pool.token1);

    let liquidity = get_liquidity_for_amounts(
        env,
        sqrt_price,
        sqrt_lower,
        sqrt_upper,
        from_amount(balance0),
        from_amount(balance1),
    );
    if liquidity == 0 {
        return Ok(0);
    }

    // the manager pulls exactly what this liquidity needs
    let (amount0, amount1) = get_amounts_for_liquidity(env, sqrt_price, sqrt_lower, sqrt_upper, liquidity);
    base::authorize_transfers(
        env,
        &[
            (pool.token0.clone(), pool.position_manager.clone(), to_amount(amount0)),
            (pool.token1.clone(), pool.position_manager.clone(), to_amount(amount1)),
        ],
    );

    let deadline = env.ledger().timestamp();
    let added = match position_id(env) {
        Some(id) => {
            let (added, _, _) = external::increase_liquidity(
                env,
                &pool.position_manager,
                IncreaseLiquidityParams {
                    position_id: id,
                    amount0_desired: balance0,
                    amount1_desired: balance1,
                    amount0_min: 0,
                    amount1_min: 0,
                    deadline,
                },
            );
            added
        }
        None => {
            let (id, added, _, _) = external::mint(
                env,
                &pool.position_manager,
                MintParams {
                    token0: pool.token0.clone(),
                    token1: pool.token1.clone(),
                    fee: pool.fee,
                    tick_lower,
                    tick_upper,
                    amount0_desired: balance0,
                    amount1_desired: balance1,
                    amount0_min: 0,
                    amount1_min: 0,
                    recipient: env.current_contract_address(),
                    deadline,
                },
            );
            env.storage().instance().set(&DataKey::PositionId, &id);
            env.events().publish(
                (Symbol::new(env, "position_minted"), id),
                (tick_lower, tick_upper),
            );
            added
        }
    };
    Ok(added)
}

/// Collect fees and released principal owed to the position
pub fn collect(env: &Env, pool: &PoolConfig) -> (u128, u128) {
    match position_id(env) {
        Some(id) => external::collect_all(env, &pool.position_manager, id),
        None => (0, 0),
    }
}

/// Remove enough liquidity to release roughly `value` of underlying
pub fn release_value(env: &Env, config: &StrategyConfig, pool: &PoolConfig, value: u128) -> Result<(), YieldError> {
    let Some((id, position)) = current_position(env, pool) else {
        return Ok(());
    };
    if position.liquidity == 0 || value == 0 {
        return Ok(());
    }

    let (amount0, amount1) = liquidity_amounts(env, pool);
    let position_value = value_in_underlying(env, config, pool, amount0, amount1);
    let liquidity = if position_value == 0 {
        position.liquidity
    } else {
        mul_div_rounding_up(env, position.liquidity, value, position_value).min(position.liquidity)
    };

    external::decrease_liquidity(env, &pool.position_manager, id, liquidity);
    external::collect_all(env, &pool.position_manager, id);
    Ok(())
}

/// Withdraw all liquidity, collect everything owed and burn the position.
/// Returns the range the position covered.
pub fn close(env: &Env, pool: &PoolConfig) -> Option<(i32, i32)> {
    let (id, position) = current_position(env, pool)?;
    if position.liquidity > 0 {
        external::decrease_liquidity(env, &pool.position_manager, id, position.liquidity);
    }
    external::collect_all(env, &pool.position_manager, id);
    external::burn(env, &pool.position_manager, id);
    env.storage().instance().remove(&DataKey::PositionId);

    env.events()
        .publish((Symbol::new(env, "position_closed"), id), position.liquidity);
    Some((position.tick_lower, position.tick_upper))
}

/// Swap whichever pool token is not the underlying back into it
pub fn convert_to_underlying(env: &Env, config: &StrategyConfig, pool: &PoolConfig) -> Result<i128, YieldError> {
    let other = if config.underlying == pool.token0 {
        &pool.token1
    } else {
        &pool.token0
    };
    let amount = base::balance(env, other);
    base::swap_tokens(env, config, other, &config.underlying, amount)
}
