//! Transitions of the strategy slot, kept free of storage and calls.

use soroban_sdk::{Address, BytesN};
use yield_types::{ready_at, PendingStrategy, PendingUpgrade, StrategySlot, YieldError};

/// Announce `next`; committable at `now + delay`. Re-announcing restarts
/// the wait but keeps the strategy that currently holds the funds.
pub fn announce(slot: &StrategySlot, next: Address, now: u64, delay: u64) -> Result<StrategySlot, YieldError> {
    let current = match slot {
        StrategySlot::Empty => None,
        StrategySlot::Active(strategy) => Some(strategy.clone()),
        StrategySlot::AnnouncedPending(pending) => pending.current.clone(),
        StrategySlot::UpgradePending(_) => return Err(YieldError::AlreadyScheduled),
    };
    Ok(StrategySlot::AnnouncedPending(PendingStrategy {
        current,
        next,
        ready_at: ready_at(now, delay),
    }))
}

/// Check that `next` may be committed now and return the pending swap
pub fn commit(slot: &StrategySlot, next: &Address, now: u64) -> Result<PendingStrategy, YieldError> {
    let StrategySlot::AnnouncedPending(pending) = slot else {
        return Err(YieldError::NothingScheduled);
    };
    if pending.next != *next {
        return Err(YieldError::StrategyMismatch);
    }
    if now < pending.ready_at {
        return Err(YieldError::TooEarly);
    }
    Ok(pending.clone())
}

pub fn cancel_announcement(slot: &StrategySlot) -> Result<StrategySlot, YieldError> {
    match slot {
        StrategySlot::AnnouncedPending(pending) => Ok(match &pending.current {
            Some(strategy) => StrategySlot::Active(strategy.clone()),
            None => StrategySlot::Empty,
        }),
        _ => Err(YieldError::NothingScheduled),
    }
}

/// Active strategy that an upgrade can be scheduled on
pub fn upgradable(slot: &StrategySlot) -> Result<Address, YieldError> {
    match slot {
        StrategySlot::Active(strategy) => Ok(strategy.clone()),
        StrategySlot::Empty => Err(YieldError::NoStrategy),
        _ => Err(YieldError::AlreadyScheduled),
    }
}

/// Mark `strategy` as upgrading. The gate opens no earlier than the vault's
/// own `min_delay`, whatever delay the strategy itself reported.
pub fn begin_upgrade(
    strategy: Address,
    implementation: BytesN<32>,
    strategy_ready_at: u64,
    now: u64,
    min_delay: u64,
) -> StrategySlot {
    StrategySlot::UpgradePending(PendingUpgrade {
        strategy,
        implementation,
        ready_at: strategy_ready_at.max(ready_at(now, min_delay)),
    })
}

/// Pending upgrade, once its delay has passed
pub fn finish_upgrade(slot: &StrategySlot, now: u64) -> Result<PendingUpgrade, YieldError> {
    let pending = pending_upgrade(slot)?;
    if now < pending.ready_at {
        return Err(YieldError::NotReady);
    }
    Ok(pending)
}

pub fn pending_upgrade(slot: &StrategySlot) -> Result<PendingUpgrade, YieldError> {
    match slot {
        StrategySlot::UpgradePending(pending) => Ok(pending.clone()),
        _ => Err(YieldError::NothingScheduled),
    }
}
