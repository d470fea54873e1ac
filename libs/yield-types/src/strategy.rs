use crate::YieldError;
use soroban_sdk::{contracttype, Address, BytesN};

/// Strategy swap announced by governance, waiting for `ready_at`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingStrategy {
    /// Strategy active when the swap was announced (None for a fresh vault)
    pub current: Option<Address>,
    pub next: Address,
    pub ready_at: u64,
}

/// Implementation swap scheduled on the active strategy
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingUpgrade {
    pub strategy: Address,
    pub implementation: BytesN<32>,
    pub ready_at: u64,
}

/// The vault's strategy slot.
///
/// Transitions: `Empty -> AnnouncedPending -> Active`, then from `Active`
/// either another `AnnouncedPending` (swap) or `UpgradePending` (in-place
/// implementation upgrade) which returns to `Active`. Only `Active` lets
/// the vault invest or harvest.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StrategySlot {
    Empty,
    AnnouncedPending(PendingStrategy),
    Active(Address),
    UpgradePending(PendingUpgrade),
}

impl StrategySlot {
    /// Strategy currently holding vault capital, if any
    pub fn holder(&self) -> Option<Address> {
        match self {
            StrategySlot::Empty => None,
            StrategySlot::AnnouncedPending(pending) => pending.current.clone(),
            StrategySlot::Active(strategy) => Some(strategy.clone()),
            StrategySlot::UpgradePending(pending) => Some(pending.strategy.clone()),
        }
    }

    /// Strategy eligible for investing and harvesting
    pub fn active(&self) -> Option<Address> {
        match self {
            StrategySlot::Active(strategy) => Some(strategy.clone()),
            _ => None,
        }
    }
}

/// Timestamp at which a change announced at `now` becomes committable
pub fn ready_at(now: u64, delay: u64) -> u64 {
    now.saturating_add(delay)
}

/// A scheduled contract implementation swap (wasm hash + earliest time)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpgradeSchedule {
    pub implementation: BytesN<32>,
    pub ready_at: u64,
}

impl UpgradeSchedule {
    pub fn new(implementation: BytesN<32>, now: u64, delay: u64) -> Self {
        Self {
            implementation,
            ready_at: ready_at(now, delay),
        }
    }

    pub fn is_ready(&self, now: u64) -> bool {
        now >= self.ready_at
    }

    /// Returns the implementation to install once the delay has elapsed
    pub fn take_if_ready(&self, now: u64) -> Result<BytesN<32>, YieldError> {
        if !self.is_ready(now) {
            return Err(YieldError::NotReady);
        }
        Ok(self.implementation.clone())
    }
}

/// Fraction of the vault's holdings that may be delegated to the strategy
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvestRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl InvestRatio {
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, YieldError> {
        if denominator == 0 || numerator > denominator {
            return Err(YieldError::InvalidRatio);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn full() -> Self {
        Self {
            numerator: 100,
            denominator: 100,
        }
    }
}
