use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, IntoVal, Symbol};
use yield_math::{get_amounts_for_liquidity, get_liquidity_for_amounts, get_sqrt_ratio_at_tick};
use yield_types::{
    CollectParams, DecreaseLiquidityParams, IncreaseLiquidityParams, MintParams, PositionData,
};

#[contracttype]
#[derive(Clone)]
enum PoolKey {
    Token0,
    Token1,
    Fee,
    TickSpacing,
    Tick,
}

/// Pool whose price is set directly by the test, always on a tick
#[contract]
pub struct MockPool;

#[contractimpl]
impl MockPool {
    pub fn initialize(env: Env, token0: Address, token1: Address, fee: u32, tick_spacing: i32, tick: i32) {
        let storage = env.storage().instance();
        storage.set(&PoolKey::Token0, &token0);
        storage.set(&PoolKey::Token1, &token1);
        storage.set(&PoolKey::Fee, &fee);
        storage.set(&PoolKey::TickSpacing, &tick_spacing);
        storage.set(&PoolKey::Tick, &tick);
    }

    pub fn set_tick(env: Env, tick: i32) {
        env.storage().instance().set(&PoolKey::Tick, &tick);
    }

    pub fn tick(env: Env) -> i32 {
        env.storage().instance().get(&PoolKey::Tick).unwrap()
    }

    pub fn sqrt_price_x96(env: Env) -> u128 {
        get_sqrt_ratio_at_tick(&env, Self::tick(env.clone()))
    }

    pub fn token0(env: Env) -> Address {
        env.storage().instance().get(&PoolKey::Token0).unwrap()
    }

    pub fn token1(env: Env) -> Address {
        env.storage().instance().get(&PoolKey::Token1).unwrap()
    }

    pub fn fee(env: Env) -> u32 {
        env.storage().instance().get(&PoolKey::Fee).unwrap()
    }

    pub fn tick_spacing(env: Env) -> i32 {
        env.storage().instance().get(&PoolKey::TickSpacing).unwrap()
    }
}

#[contracttype]
#[derive(Clone)]
enum ManagerKey {
    Pool,
    NextId,
    Position(u32),
    Owner(u32),
}

/// Position manager over a single [`MockPool`].
///
/// Token amounts follow the real liquidity math at the pool's current
/// price, so when a test moves the price it must also fund the manager
/// with whatever the position is now owed.
#[contract]
pub struct MockPositionManager;

#[contractimpl]
impl MockPositionManager {
    pub fn initialize(env: Env, pool: Address) {
        env.storage().instance().set(&ManagerKey::Pool, &pool);
        env.storage().instance().set(&ManagerKey::NextId, &1u32);
    }

    pub fn mint(env: Env, params: MintParams) -> (u32, u128, i128, i128) {
        params.recipient.require_auth();
        let pool = pool(&env);
        let (liquidity, amount0, amount1) = add_liquidity(
            &env,
            &pool,
            &params.recipient,
            params.tick_lower,
            params.tick_upper,
            params.amount0_desired,
            params.amount1_desired,
        );

        let id: u32 = env.storage().instance().get(&ManagerKey::NextId).unwrap();
        env.storage().instance().set(&ManagerKey::NextId, &(id + 1));
        env.storage().persistent().set(
            &ManagerKey::Position(id),
            &PositionData {
                pool,
                tick_lower: params.tick_lower,
                tick_upper: params.tick_upper,
                liquidity,
                fee_growth_inside_0_last_x128: 0,
                fee_growth_inside_1_last_x128: 0,
                tokens_owed_0: 0,
                tokens_owed_1: 0,
            },
        );
        env.storage()
            .persistent()
            .set(&ManagerKey::Owner(id), &params.recipient);

        (id, liquidity, amount0, amount1)
    }

    pub fn increase_liquidity(env: Env, params: IncreaseLiquidityParams) -> (u128, i128, i128) {
        let owner = Self::owner_of(env.clone(), params.position_id);
        owner.require_auth();
        let mut position = Self::get_position(env.clone(), params.position_id);

        let (liquidity, amount0, amount1) = add_liquidity(
            &env,
            &position.pool,
            &owner,
            position.tick_lower,
            position.tick_upper,
            params.amount0_desired,
            params.amount1_desired,
        );
        position.liquidity += liquidity;
        set_position(&env, params.position_id, &position);

        (liquidity, amount0, amount1)
    }

    pub fn decrease_liquidity(env: Env, params: DecreaseLiquidityParams) -> (i128, i128) {
        Self::owner_of(env.clone(), params.position_id).require_auth();
        let mut position = Self::get_position(env.clone(), params.position_id);
        if params.liquidity > position.liquidity {
            panic!("Insufficient liquidity");
        }

        let (amount0, amount1) = get_amounts_for_liquidity(
            &env,
            pool_sqrt_price(&env, &position.pool),
            get_sqrt_ratio_at_tick(&env, position.tick_lower),
            get_sqrt_ratio_at_tick(&env, position.tick_upper),
            params.liquidity,
        );
        position.liquidity -= params.liquidity;
        position.tokens_owed_0 += amount0;
        position.tokens_owed_1 += amount1;
        set_position(&env, params.position_id, &position);

        (amount0 as i128, amount1 as i128)
    }

    pub fn collect(env: Env, params: CollectParams) -> (u128, u128) {
        Self::owner_of(env.clone(), params.position_id).require_auth();
        let mut position = Self::get_position(env.clone(), params.position_id);

        let amount0 = position.tokens_owed_0.min(params.amount0_max);
        let amount1 = position.tokens_owed_1.min(params.amount1_max);
        position.tokens_owed_0 -= amount0;
        position.tokens_owed_1 -= amount1;
        set_position(&env, params.position_id, &position);

        let me = env.current_contract_address();
        if amount0 > 0 {
            token::Client::new(&env, &pool_token(&env, &position.pool, "token0"))
                .transfer(&me, &params.recipient, &(amount0 as i128));
        }
        if amount1 > 0 {
            token::Client::new(&env, &pool_token(&env, &position.pool, "token1"))
                .transfer(&me, &params.recipient, &(amount1 as i128));
        }
        (amount0, amount1)
    }

    pub fn burn(env: Env, position_id: u32) {
        Self::owner_of(env.clone(), position_id).require_auth();
        let position = Self::get_position(env.clone(), position_id);
        if position.liquidity != 0 {
            panic!("Position has liquidity");
        }
        if position.tokens_owed_0 != 0 || position.tokens_owed_1 != 0 {
            panic!("Position has uncollected tokens");
        }
        env.storage().persistent().remove(&ManagerKey::Position(position_id));
        env.storage().persistent().remove(&ManagerKey::Owner(position_id));
    }

    pub fn get_position(env: Env, position_id: u32) -> PositionData {
        env.storage()
            .persistent()
            .get(&ManagerKey::Position(position_id))
            .expect("Position not found")
    }

    pub fn owner_of(env: Env, position_id: u32) -> Address {
        env.storage()
            .persistent()
            .get(&ManagerKey::Owner(position_id))
            .expect("Position not found")
    }

    pub fn exists(env: Env, position_id: u32) -> bool {
        env.storage().persistent().has(&ManagerKey::Position(position_id))
    }

    // === test hooks ===

    /// Credit trading fees to a position; the test funds the manager
    pub fn accrue_fees(env: Env, position_id: u32, amount0: u128, amount1: u128) {
        let mut position = Self::get_position(env.clone(), position_id);
        position.tokens_owed_0 += amount0;
        position.tokens_owed_1 += amount1;
        set_position(&env, position_id, &position);
    }
}

fn pool(env: &Env) -> Address {
    env.storage().instance().get(&ManagerKey::Pool).unwrap()
}

fn set_position(env: &Env, id: u32, position: &PositionData) {
    env.storage().persistent().set(&ManagerKey::Position(id), position);
}

fn pool_sqrt_price(env: &Env, pool: &Address) -> u128 {
    env.invoke_contract(pool, &Symbol::new(env, "sqrt_price_x96"), ().into_val(env))
}

fn pool_token(env: &Env, pool: &Address, which: &str) -> Address {
    env.invoke_contract(pool, &Symbol::new(env, which), ().into_val(env))
}

fn add_liquidity(
    env: &Env,
    pool: &Address,
    payer: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_desired: i128,
    amount1_desired: i128,
) -> (u128, i128, i128) {
    let sqrt_price = pool_sqrt_price(env, pool);
    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

    let liquidity = get_liquidity_for_amounts(
        env,
        sqrt_price,
        sqrt_lower,
        sqrt_upper,
        amount0_desired.max(0) as u128,
        amount1_desired.max(0) as u128,
    );
    let (amount0, amount1) =
        get_amounts_for_liquidity(env, sqrt_price, sqrt_lower, sqrt_upper, liquidity);

    let me = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &pool_token(env, pool, "token0")).transfer(payer, &me, &(amount0 as i128));
    }
    if amount1 > 0 {
        token::Client::new(env, &pool_token(env, pool, "token1")).transfer(payer, &me, &(amount1 as i128));
    }
    (liquidity, amount0 as i128, amount1 as i128)
}
