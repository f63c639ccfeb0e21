// ============================================================================
// External Asset Interfaces
// What the exchange requires of token contracts and of the host currency
// ============================================================================

use crate::domain::AccountId;
use crate::numeric::Amount;

/// A fungible token contract the exchange holds balances of.
///
/// Calls return `false` when the contract refuses them (missing allowance,
/// insufficient balance); the exchange surfaces that as `TransferRejected`.
pub trait TokenContract: Send + Sync {
    /// Address of the contract, published on registration
    fn address(&self) -> &AccountId;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> bool;

    /// Move `amount` from `from` to `to`
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool;

    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Allow `spender` to move up to `amount` of `owner`'s tokens
    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> bool;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount;
}

/// Payout side of the host's native currency.
///
/// Incoming currency arrives attached to the deposit call itself; only
/// withdrawals need the host to move value.
pub trait NativeCurrency: Send + Sync {
    /// Send `amount` of native currency from the exchange to `to`
    fn pay(&self, to: &AccountId, amount: Amount) -> bool;
}
