#![no_std]

//! Universal liquidation registry.
//!
//! Maps `(venue, sell_token, buy_token)` to an ordered hop list and each
//! venue to the adapter contract that executes swaps on it. Strategies
//! resolve a [`Route`] here and then pre-fund the adapter.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Symbol, Vec};
use yield_types::{
    PairConfig, Route, YieldError, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD,
    PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD,
};

#[contract]
pub struct LiquidationRegistry;

/// Storage keys for the registry
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    /// (venue, first hop, last hop) -> hop list
    Path(Symbol, Address, Address),
    /// venue -> adapter contract
    Venue(Symbol),
    /// Number of registered venues (indexed storage)
    VenueCount,
    VenueAt(u32),
    /// (venue, token0, token1) -> fee tier, tokens sorted
    Fee(Symbol, Address, Address),
    /// (venue, token0, token1) -> pair configuration, tokens sorted
    Pair(Symbol, Address, Address),
}

// Venue listing is capped per page to stay within read entry limits
const MAX_PAGE: u32 = 50;

#[contractimpl]
impl LiquidationRegistry {
    pub fn initialize(env: Env, owner: Address) -> Result<(), YieldError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(YieldError::AlreadyInitialized);
        }
        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::VenueCount, &0u32);
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, YieldError> {
        extend_instance_ttl(&env);
        get_owner(&env)
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), YieldError> {
        let owner = get_owner(&env)?;
        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &new_owner);
        env.events().publish(
            (Symbol::new(&env, "ownership_transferred"),),
            (owner, new_owner),
        );
        Ok(())
    }

    // === Paths ===

    /// Register the hop list used to sell `path[0]` for `path[last]` on `venue`.
    /// Replaces any existing path for the same pair wholesale.
    pub fn set_path(env: Env, venue: Symbol, path: Vec<Address>) -> Result<(), YieldError> {
        get_owner(&env)?.require_auth();
        validate_path(&path)?;

        let (sell, buy) = endpoints(&path)?;
        let key = DataKey::Path(venue.clone(), sell.clone(), buy.clone());
        env.storage().persistent().set(&key, &path);
        extend_persistent_ttl(&env, &key);

        env.events().publish(
            (Symbol::new(&env, "path_set"), venue),
            (sell, buy, path.len()),
        );
        Ok(())
    }

    pub fn get_path(env: Env, venue: Symbol, sell: Address, buy: Address) -> Result<Vec<Address>, YieldError> {
        let key = DataKey::Path(venue, sell, buy);
        let path = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(YieldError::PathNotFound)?;
        extend_persistent_ttl(&env, &key);
        Ok(path)
    }

    pub fn remove_path(env: Env, venue: Symbol, sell: Address, buy: Address) -> Result<(), YieldError> {
        get_owner(&env)?.require_auth();

        let key = DataKey::Path(venue.clone(), sell.clone(), buy.clone());
        if !env.storage().persistent().has(&key) {
            return Err(YieldError::PathNotFound);
        }
        env.storage().persistent().remove(&key);

        env.events()
            .publish((Symbol::new(&env, "path_removed"), venue), (sell, buy));
        Ok(())
    }

    // === Venues ===

    /// Register (or re-point) the adapter that executes swaps on `venue`
    pub fn set_venue(env: Env, venue: Symbol, adapter: Address) -> Result<(), YieldError> {
        get_owner(&env)?.require_auth();

        let key = DataKey::Venue(venue.clone());
        if !env.storage().persistent().has(&key) {
            let count: u32 = env
                .storage()
                .instance()
                .get(&DataKey::VenueCount)
                .unwrap_or(0);
            let at_key = DataKey::VenueAt(count);
            env.storage().persistent().set(&at_key, &venue);
            extend_persistent_ttl(&env, &at_key);
            env.storage().instance().set(&DataKey::VenueCount, &(count + 1));
        }
        env.storage().persistent().set(&key, &adapter);
        extend_persistent_ttl(&env, &key);
        extend_instance_ttl(&env);

        env.events()
            .publish((Symbol::new(&env, "venue_set"), venue), adapter);
        Ok(())
    }

    pub fn get_venue(env: Env, venue: Symbol) -> Result<Address, YieldError> {
        env.storage()
            .persistent()
            .get(&DataKey::Venue(venue))
            .ok_or(YieldError::VenueNotFound)
    }

    pub fn get_venue_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::VenueCount)
            .unwrap_or(0)
    }

    /// Registered venue names, at most 50 per page
    pub fn get_venues_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Symbol> {
        let count = Self::get_venue_count(env.clone());
        let end = start_index.saturating_add(limit.min(MAX_PAGE)).min(count);

        let mut venues = Vec::new(&env);
        for i in start_index..end {
            if let Some(venue) = env.storage().persistent().get(&DataKey::VenueAt(i)) {
                venues.push_back(venue);
            }
        }
        venues
    }

    // === Venue parameters ===

    /// Fee tier used when routing `token_a`/`token_b` on a fee-tiered venue
    pub fn set_fee(env: Env, venue: Symbol, token_a: Address, token_b: Address, fee: u32) -> Result<(), YieldError> {
        get_owner(&env)?.require_auth();
        if token_a == token_b {
            return Err(YieldError::InvalidPath);
        }

        let (token0, token1) = sort_tokens(token_a, token_b);
        let key = DataKey::Fee(venue.clone(), token0.clone(), token1.clone());
        env.storage().persistent().set(&key, &fee);
        extend_persistent_ttl(&env, &key);

        env.events()
            .publish((Symbol::new(&env, "fee_set"), venue), (token0, token1, fee));
        Ok(())
    }

    pub fn get_fee(env: Env, venue: Symbol, token_a: Address, token_b: Address) -> Option<u32> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        env.storage()
            .persistent()
            .get(&DataKey::Fee(venue, token0, token1))
    }

    /// Pool used for `token_a`/`token_b` on venues that distinguish stable and volatile pairs
    pub fn pair_setup(
        env: Env,
        venue: Symbol,
        token_a: Address,
        token_b: Address,
        pool: Address,
        stable: bool,
    ) -> Result<(), YieldError> {
        get_owner(&env)?.require_auth();
        if token_a == token_b {
            return Err(YieldError::InvalidPath);
        }

        let (token0, token1) = sort_tokens(token_a, token_b);
        let key = DataKey::Pair(venue.clone(), token0.clone(), token1.clone());
        env.storage()
            .persistent()
            .set(&key, &PairConfig { pool: pool.clone(), stable });
        extend_persistent_ttl(&env, &key);

        env.events().publish(
            (Symbol::new(&env, "pair_setup"), venue),
            (token0, token1, pool, stable),
        );
        Ok(())
    }

    pub fn get_pair(env: Env, venue: Symbol, token_a: Address, token_b: Address) -> Option<PairConfig> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        env.storage()
            .persistent()
            .get(&DataKey::Pair(venue, token0, token1))
    }

    // === Resolution ===

    /// Everything a strategy needs to sell `sell` for `buy` on `venue`
    pub fn resolve(env: Env, venue: Symbol, sell: Address, buy: Address) -> Result<Route, YieldError> {
        let path = Self::get_path(env.clone(), venue.clone(), sell, buy)?;
        let adapter = Self::get_venue(env.clone(), venue.clone())?;

        let mut fees = Vec::new(&env);
        for i in 1..path.len() {
            let (Some(from), Some(to)) = (path.get(i - 1), path.get(i)) else {
                return Err(YieldError::InvalidPath);
            };
            fees.push_back(Self::get_fee(env.clone(), venue.clone(), from, to).unwrap_or(0));
        }

        Ok(Route { adapter, path, fees })
    }
}

fn get_owner(env: &Env) -> Result<Address, YieldError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(YieldError::NotInitialized)
}

/// A path needs at least two hops and no hop may repeat its predecessor
fn validate_path(path: &Vec<Address>) -> Result<(), YieldError> {
    if path.len() < 2 {
        return Err(YieldError::InvalidPath);
    }
    let mut previous: Option<Address> = None;
    for hop in path.iter() {
        if previous.as_ref() == Some(&hop) {
            return Err(YieldError::InvalidPath);
        }
        previous = Some(hop);
    }
    Ok(())
}

fn endpoints(path: &Vec<Address>) -> Result<(Address, Address), YieldError> {
    match (path.first(), path.last()) {
        (Some(sell), Some(buy)) if sell != buy => Ok((sell, buy)),
        _ => Err(YieldError::InvalidPath),
    }
}

fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
