use soroban_sdk::{contracttype, Address, Vec};

/// A fully resolved liquidation route: the venue adapter to pre-fund and
/// the hop list (first hop sold, last hop bought) with one fee tier per leg.
///
/// `fees` holds one entry per leg, 0 where the venue has no fee configured.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    pub adapter: Address,
    pub path: Vec<Address>,
    pub fees: Vec<u32>,
}

/// Venue-specific pair configuration (e.g. stable/volatile pools)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairConfig {
    pub pool: Address,
    pub stable: bool,
}
