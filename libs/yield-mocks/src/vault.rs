use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env};

/// Bare vault exposing only what strategies read at initialization
#[contract]
pub struct MockVault;

#[contractimpl]
impl MockVault {
    pub fn initialize(env: Env, underlying: Address) {
        env.storage().instance().set(&symbol_short!("under"), &underlying);
    }

    pub fn underlying(env: Env) -> Address {
        env.storage().instance().get(&symbol_short!("under")).unwrap()
    }
}
