// ============================================================================
// Fixed Supply Token
// In-memory fungible token; the whole supply is minted to its owner
// ============================================================================

use crate::domain::AccountId;
use crate::interfaces::TokenContract;
use crate::numeric::Amount;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct TokenState {
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
}

/// Fungible token with a fixed total supply.
///
/// Used as the external token reference in tests and demos. State sits
/// behind a mutex because contracts are shared handles (`Arc<dyn TokenContract>`).
#[derive(Debug)]
pub struct FixedSupplyToken {
    address: AccountId,
    symbol: String,
    total_supply: Amount,
    state: Mutex<TokenState>,
}

impl FixedSupplyToken {
    /// Deploy a token at `address`, minting `total_supply` to `owner`.
    pub fn new(
        address: impl Into<AccountId>,
        symbol: impl Into<String>,
        owner: &AccountId,
        total_supply: Amount,
    ) -> Self {
        let mut state = TokenState::default();
        state.balances.insert(owner.clone(), total_supply);
        Self {
            address: address.into(),
            symbol: symbol.into(),
            total_supply,
            state: Mutex::new(state),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn move_balance(state: &mut TokenState, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        let from_balance = state.balances.get(from).copied().unwrap_or_default();
        let Ok(debited) = from_balance.checked_sub(amount) else {
            return false;
        };
        if from == to {
            return true;
        }
        let to_balance = state.balances.get(to).copied().unwrap_or_default();
        let Ok(credited) = to_balance.checked_add(amount) else {
            return false;
        };
        state.balances.insert(from.clone(), debited);
        state.balances.insert(to.clone(), credited);
        true
    }
}

impl TokenContract for FixedSupplyToken {
    fn address(&self) -> &AccountId {
        &self.address
    }

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> bool {
        let mut state = self.state.lock();
        let key = (from.clone(), spender.clone());
        let allowance = state.allowances.get(&key).copied().unwrap_or_default();
        let Ok(left) = allowance.checked_sub(amount) else {
            tracing::debug!(token = %self.symbol, %from, %spender, "transfer_from exceeds allowance");
            return false;
        };
        if !Self::move_balance(&mut state, from, to, amount) {
            return false;
        }
        state.allowances.insert(key, left);
        true
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        let mut state = self.state.lock();
        Self::move_balance(&mut state, from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.state
            .lock()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> bool {
        self.state
            .lock()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
        true
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state
            .lock()
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }
}
