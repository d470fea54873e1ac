//! Calls into the concentrated-liquidity pool and its position manager.

use soroban_sdk::{Address, Env, IntoVal, Symbol};
use yield_types::{
    CollectParams, DecreaseLiquidityParams, IncreaseLiquidityParams, MintParams, PositionData,
};

pub fn pool_sqrt_price(env: &Env, pool: &Address) -> u128 {
    env.invoke_contract(pool, &Symbol::new(env, "sqrt_price_x96"), ().into_val(env))
}

pub fn pool_tick(env: &Env, pool: &Address) -> i32 {
    env.invoke_contract(pool, &Symbol::new(env, "tick"), ().into_val(env))
}

pub fn pool_tick_spacing(env: &Env, pool: &Address) -> i32 {
    env.invoke_contract(pool, &Symbol::new(env, "tick_spacing"), ().into_val(env))
}

pub fn pool_fee(env: &Env, pool: &Address) -> u32 {
    env.invoke_contract(pool, &Symbol::new(env, "fee"), ().into_val(env))
}

pub fn pool_token(env: &Env, pool: &Address, which: &str) -> Address {
    env.invoke_contract(pool, &Symbol::new(env, which), ().into_val(env))
}

pub fn mint(env: &Env, manager: &Address, params: MintParams) -> (u32, u128, i128, i128) {
    env.invoke_contract(manager, &Symbol::new(env, "mint"), (params,).into_val(env))
}

pub fn increase_liquidity(env: &Env, manager: &Address, params: IncreaseLiquidityParams) -> (u128, i128, i128) {
    env.invoke_contract(
        manager,
        &Symbol::new(env, "increase_liquidity"),
        (params,).into_val(env),
    )
}

pub fn decrease_liquidity(env: &Env, manager: &Address, position_id: u32, liquidity: u128) -> (i128, i128) {
    let params = DecreaseLiquidityParams {
        position_id,
        liquidity,
        amount0_min: 0,
        amount1_min: 0,
        deadline: env.ledger().timestamp(),
    };
    env.invoke_contract(
        manager,
        &Symbol::new(env, "decrease_liquidity"),
        (params,).into_val(env),
    )
}

/// Collect everything owed to the position into this contract
pub fn collect_all(env: &Env, manager: &Address, position_id: u32) -> (u128, u128) {
    let params = CollectParams {
        position_id,
        recipient: env.current_contract_address(),
        amount0_max: u128::MAX,
        amount1_max: u128::MAX,
    };
    env.invoke_contract(manager, &Symbol::new(env, "collect"), (params,).into_val(env))
}

pub fn burn(env: &Env, manager: &Address, position_id: u32) {
    env.invoke_contract::<()>(manager, &Symbol::new(env, "burn"), (position_id,).into_val(env));
}

pub fn get_position(env: &Env, manager: &Address, position_id: u32) -> PositionData {
    env.invoke_contract(
        manager,
        &Symbol::new(env, "get_position"),
        (position_id,).into_val(env),
    )
}
