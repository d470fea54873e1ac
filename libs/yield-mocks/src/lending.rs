use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

#[contracttype]
#[derive(Clone)]
enum MarketKey {
    Token,
    RewardToken,
    Supplied(Address),
    PendingReward(Address),
}

/// Lending market holding one asset and paying one reward token.
/// Interest is injected with `accrue`; the test must fund the market.
#[contract]
pub struct MockLendingMarket;

#[contractimpl]
impl MockLendingMarket {
    pub fn initialize(env: Env, token: Address, reward_token: Address) {
        env.storage().instance().set(&MarketKey::Token, &token);
        env.storage().instance().set(&MarketKey::RewardToken, &reward_token);
    }

    pub fn underlying(env: Env) -> Address {
        env.storage().instance().get(&MarketKey::Token).unwrap()
    }

    pub fn supply(env: Env, from: Address, amount: i128) {
        from.require_auth();
        let token = Self::underlying(env.clone());
        token::Client::new(&env, &token).transfer(&from, &env.current_contract_address(), &amount);
        let supplied = Self::balance(env.clone(), from.clone());
        env.storage()
            .persistent()
            .set(&MarketKey::Supplied(from), &(supplied + amount));
    }

    pub fn withdraw(env: Env, to: Address, amount: i128) -> i128 {
        to.require_auth();
        let supplied = Self::balance(env.clone(), to.clone());
        let amount = amount.min(supplied);
        let token = Self::underlying(env.clone());
        token::Client::new(&env, &token).transfer(&env.current_contract_address(), &to, &amount);
        env.storage()
            .persistent()
            .set(&MarketKey::Supplied(to), &(supplied - amount));
        amount
    }

    pub fn balance(env: Env, owner: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&MarketKey::Supplied(owner))
            .unwrap_or(0)
    }

    pub fn claim(env: Env, to: Address) -> i128 {
        to.require_auth();
        let key = MarketKey::PendingReward(to.clone());
        let pending: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        if pending > 0 {
            let reward: Address = env.storage().instance().get(&MarketKey::RewardToken).unwrap();
            token::Client::new(&env, &reward).transfer(&env.current_contract_address(), &to, &pending);
            env.storage().persistent().remove(&key);
        }
        pending
    }

    // === test hooks ===

    pub fn accrue(env: Env, owner: Address, interest: i128) {
        let supplied = Self::balance(env.clone(), owner.clone());
        env.storage()
            .persistent()
            .set(&MarketKey::Supplied(owner), &(supplied + interest));
    }

    pub fn add_reward(env: Env, owner: Address, amount: i128) {
        let key = MarketKey::PendingReward(owner);
        let pending: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(pending + amount));
    }
}
