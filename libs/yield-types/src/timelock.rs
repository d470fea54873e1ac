use soroban_sdk::{contracttype, Address, BytesN, Symbol, Val, Vec};

/// One contract call carried by a timelocked operation
#[contracttype]
#[derive(Clone, Debug)]
pub struct Call {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
    /// Amount of the timelock's native token forwarded to `target` first
    pub value: i128,
}

/// A scheduled batch of calls
#[contracttype]
#[derive(Clone, Debug)]
pub struct Operation {
    pub calls: Vec<Call>,
    /// Operation that must be executed first (all-zero for none)
    pub predecessor: BytesN<32>,
    pub salt: BytesN<32>,
    pub ready_at: u64,
    pub executed: bool,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Proposer,
    Executor,
    Canceller,
}

/// A `min_delay` change waiting out the delay it replaces
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelayChange {
    pub delay: u64,
    pub ready_at: u64,
}
