use soroban_sdk::auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation};
use soroban_sdk::{token, vec, Address, Env, IntoVal, Symbol, Vec};
use yield_types::YieldError;

pub fn balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}

pub fn transfer(env: &Env, token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, token).transfer(&env.current_contract_address(), to, &amount);
    }
}

/// Pre-authorize `token.transfer(self, to, amount)` calls made on our
/// behalf by the contract we are about to invoke (lending market,
/// position manager), since we are not their direct invoker.
pub fn authorize_transfers(env: &Env, transfers: &[(Address, Address, i128)]) {
    let me = env.current_contract_address();
    let mut entries: Vec<InvokerContractAuthEntry> = Vec::new(env);
    for (token, to, amount) in transfers.iter() {
        if *amount <= 0 {
            continue;
        }
        entries.push_back(InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: token.clone(),
                fn_name: Symbol::new(env, "transfer"),
                args: vec![
                    env,
                    me.clone().into_val(env),
                    to.clone().into_val(env),
                    amount.into_val(env),
                ],
            },
            sub_invocations: Vec::new(env),
        }));
    }
    if !entries.is_empty() {
        env.authorize_as_current_contract(entries);
    }
}

/// Governance recovery of tokens the strategy does not account for
pub fn salvage(
    env: &Env,
    protected: &Vec<Address>,
    recipient: &Address,
    token: &Address,
    amount: i128,
) -> Result<(), YieldError> {
    if protected.contains(token) {
        return Err(YieldError::Unauthorized);
    }
    if amount <= 0 {
        return Err(YieldError::InvalidAmount);
    }
    transfer(env, token, recipient, amount);
    env.events().publish(
        (Symbol::new(env, "salvaged"), token.clone()),
        (recipient.clone(), amount),
    );
    Ok(())
}
