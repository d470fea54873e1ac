//! Argument and result shapes of the external position manager.
//!
//! Field names are part of the encoding the manager expects, so they follow
//! its interface rather than local naming.

use soroban_sdk::{contracttype, Address};

/// A managed position as `get_position` reports it
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionData {
    pub pool: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x128: u128,
    pub fee_growth_inside_1_last_x128: u128,
    /// Released principal plus uncollected fees, claimable through `collect`
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

/// Opens a new position; the strategy always passes itself as `recipient`
#[contracttype]
#[derive(Clone, Debug)]
pub struct MintParams {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: i128,
    pub amount1_desired: i128,
    pub amount0_min: i128,
    pub amount1_min: i128,
    pub recipient: Address,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IncreaseLiquidityParams {
    pub position_id: u32,
    pub amount0_desired: i128,
    pub amount1_desired: i128,
    pub amount0_min: i128,
    pub amount1_min: i128,
    pub deadline: u64,
}

/// Moves `liquidity` out of the range into tokens owed
#[contracttype]
#[derive(Clone, Debug)]
pub struct DecreaseLiquidityParams {
    pub position_id: u32,
    pub liquidity: u128,
    pub amount0_min: i128,
    pub amount1_min: i128,
    pub deadline: u64,
}

/// Pays out up to the given maxima of tokens owed
#[contracttype]
#[derive(Clone, Debug)]
pub struct CollectParams {
    pub position_id: u32,
    pub recipient: Address,
    pub amount0_max: u128,
    pub amount1_max: u128,
}
