use crate::config::{reward_tokens, StrategyConfig};
use crate::token::{balance, transfer};
use soroban_sdk::{log, token, Address, Env, IntoVal, Symbol};
use yield_math::bps_of;
use yield_types::{Route, YieldError};

/// Look up how to sell `sell` for `buy` on the configured venue
pub fn resolve_route(env: &Env, config: &StrategyConfig, sell: &Address, buy: &Address) -> Result<Route, YieldError> {
    let result = env.try_invoke_contract::<Route, YieldError>(
        &config.registry,
        &Symbol::new(env, "resolve"),
        (config.venue.clone(), sell.clone(), buy.clone()).into_val(env),
    );
    match result {
        Ok(Ok(route)) => Ok(route),
        Ok(Err(_)) => Err(YieldError::InvalidPath),
        Err(Ok(err)) => Err(err),
        Err(Err(_)) => Err(YieldError::PathNotFound),
    }
}

/// Sell `amount_in` along `route`. The adapter is pre-funded and pays out
/// to this contract; the received amount is measured by balance delta.
pub fn swap_along(env: &Env, route: &Route, amount_in: i128, min_out: i128) -> Result<i128, YieldError> {
    let (Some(sell), Some(buy)) = (route.path.first(), route.path.last()) else {
        return Err(YieldError::InvalidPath);
    };
    if amount_in <= 0 {
        return Ok(0);
    }

    let me = env.current_contract_address();
    let before = token::Client::new(env, &buy).balance(&me);

    transfer(env, &sell, &route.adapter, amount_in);
    env.invoke_contract::<i128>(
        &route.adapter,
        &Symbol::new(env, "swap"),
        (
            route.path.clone(),
            route.fees.clone(),
            amount_in,
            min_out,
            me.clone(),
        )
            .into_val(env),
    );

    let received = token::Client::new(env, &buy).balance(&me) - before;
    if received < min_out {
        return Err(YieldError::SlippageExceeded);
    }
    Ok(received)
}

/// Resolve and execute `sell -> buy` in one step
pub fn swap_tokens(
    env: &Env,
    config: &StrategyConfig,
    sell: &Address,
    buy: &Address,
    amount_in: i128,
) -> Result<i128, YieldError> {
    if amount_in <= 0 || sell == buy {
        return Ok(0);
    }
    let route = resolve_route(env, config, sell, buy)?;
    swap_along(env, &route, amount_in, 1)
}

/// Send the profit-sharing cut of `amount` of `reward` to the fee recipient.
/// Returns what is left to liquidate.
pub fn take_profit_share(env: &Env, config: &StrategyConfig, reward: &Address, amount: i128) -> i128 {
    let bps: u32 = env.invoke_contract(
        &config.storage,
        &Symbol::new(env, "profit_sharing_bps"),
        ().into_val(env),
    );
    let fee = bps_of(env, amount, bps);
    if fee == 0 {
        return amount;
    }

    let recipient: Address = env.invoke_contract(
        &config.storage,
        &Symbol::new(env, "fee_recipient"),
        ().into_val(env),
    );
    transfer(env, reward, &recipient, fee);
    env.events().publish(
        (Symbol::new(env, "profit_shared"), reward.clone()),
        (recipient, fee),
    );
    amount - fee
}

/// Convert every held reward token other than `target` into `target`.
///
/// A reward with no balance is skipped, so a harvest with nothing pending
/// is a no-op. Returns the total amount of `target` obtained.
pub fn liquidate_rewards(env: &Env, config: &StrategyConfig, target: &Address) -> Result<i128, YieldError> {
    let mut obtained = 0i128;
    for reward in reward_tokens(env).iter() {
        if reward == *target {
            continue;
        }
        let amount = balance(env, &reward);
        if amount <= 0 {
            continue;
        }

        let remaining = take_profit_share(env, config, &reward, amount);
        let route = resolve_route(env, config, &reward, target)?;
        let received = swap_along(env, &route, remaining, 1)?;
        log!(env, "liquidated reward", reward, remaining, received);
        obtained += received;
    }
    Ok(obtained)
}
