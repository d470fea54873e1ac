use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, Vec};

#[contracttype]
#[derive(Clone)]
enum AdapterKey {
    Rate(Address, Address),
}

/// Venue adapter swapping at fixed rates set by the test.
/// Expects to be pre-funded with the input and holding enough output.
#[contract]
pub struct MockSwapAdapter;

#[contractimpl]
impl MockSwapAdapter {
    pub fn set_rate(env: Env, sell: Address, buy: Address, numerator: i128, denominator: i128) {
        env.storage()
            .instance()
            .set(&AdapterKey::Rate(sell, buy), &(numerator, denominator));
    }

    pub fn swap(
        env: Env,
        path: Vec<Address>,
        _fees: Vec<u32>,
        amount_in: i128,
        min_out: i128,
        recipient: Address,
    ) -> i128 {
        let sell = path.first().unwrap();
        let buy = path.last().unwrap();
        let (numerator, denominator): (i128, i128) = env
            .storage()
            .instance()
            .get(&AdapterKey::Rate(sell, buy.clone()))
            .unwrap_or((1, 1));

        let amount_out = amount_in * numerator / denominator;
        if amount_out < min_out {
            panic!("Insufficient output amount");
        }
        token::Client::new(&env, &buy).transfer(&env.current_contract_address(), &recipient, &amount_out);
        amount_out
    }
}
