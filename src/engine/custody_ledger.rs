// ============================================================================
// Custody Ledger
// Per-account balances held on behalf of users, with staged atomic batches
// ============================================================================

use crate::domain::{Account, AccountId, Asset, Balance};
use crate::error::{ExchangeError, ExchangeResult};
use crate::numeric::{Amount, NumericError};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cumulative flows of one asset across the exchange boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Supply {
    pub deposited: Amount,
    pub withdrawn: Amount,
}

impl Supply {
    /// What the ledger must currently hold: deposits minus withdrawals
    pub fn outstanding(&self) -> Amount {
        // withdrawn never exceeds deposited: a withdrawal is a debit of held funds
        self.deposited.checked_sub(self.withdrawn).unwrap_or_default()
    }
}

/// Balances of every account, plus supply accounting per asset.
///
/// All mutations go through a [`LedgerBatch`]: an operation stages its
/// changes and the caller commits them only when the whole operation
/// succeeded.
#[derive(Debug, Clone, Default)]
pub struct CustodyLedger {
    accounts: HashMap<AccountId, Account>,
    supply: HashMap<Asset, Supply>,
}

impl CustodyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Available + escrowed balance of one asset
    pub fn balance(&self, account: &AccountId, asset: &Asset) -> Balance {
        self.accounts
            .get(account)
            .map(|a| a.balance(asset))
            .unwrap_or_default()
    }

    pub fn available(&self, account: &AccountId, asset: &Asset) -> Amount {
        self.balance(account, asset).available()
    }

    pub fn account(&self, account: &AccountId) -> Option<&Account> {
        self.accounts.get(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Account)> + '_ {
        self.accounts.iter()
    }

    pub fn supply(&self, asset: &Asset) -> Supply {
        self.supply.get(asset).copied().unwrap_or_default()
    }

    /// Sum of available and escrowed balances of `asset` over all accounts
    pub fn holdings(&self, asset: &Asset) -> Amount {
        self.accounts
            .values()
            .map(|account| {
                let balance = account.balance(asset);
                balance.total().unwrap_or(Amount::MAX)
            })
            .sum()
    }

    /// True when, for every asset ever deposited, holdings equal
    /// deposits minus withdrawals.
    pub fn is_conserved(&self) -> bool {
        self.supply
            .iter()
            .all(|(asset, supply)| self.holdings(asset) == supply.outstanding())
    }

    /// Start staging changes against the current state
    pub fn batch(&self) -> LedgerBatch<'_> {
        LedgerBatch {
            ledger: self,
            changes: StagedChanges::default(),
        }
    }

    /// Apply a finished batch
    pub fn commit(&mut self, changes: StagedChanges) {
        for ((account, asset), balance) in changes.balances {
            *self.accounts.entry(account).or_default().balance_mut(&asset) = balance;
        }
        for (asset, supply) in changes.supply {
            self.supply.insert(asset, supply);
        }
    }
}

/// Final values of every balance and supply counter a batch touched
#[derive(Debug, Default)]
pub struct StagedChanges {
    balances: HashMap<(AccountId, Asset), Balance>,
    supply: HashMap<Asset, Supply>,
}

/// Copy-on-write view of the ledger.
///
/// Reads see staged values first. Every method checks its arithmetic and
/// leaves the staged value untouched on error, so a failed operation can
/// simply drop the batch.
pub struct LedgerBatch<'a> {
    ledger: &'a CustodyLedger,
    changes: StagedChanges,
}

impl<'a> LedgerBatch<'a> {
    pub fn balance(&self, account: &AccountId, asset: &Asset) -> Balance {
        self.changes
            .balances
            .get(&(account.clone(), asset.clone()))
            .copied()
            .unwrap_or_else(|| self.ledger.balance(account, asset))
    }

    fn staged(&mut self, account: &AccountId, asset: &Asset) -> &mut Balance {
        let ledger = self.ledger;
        self.changes
            .balances
            .entry((account.clone(), asset.clone()))
            .or_insert_with(|| ledger.balance(account, asset))
    }

    fn staged_supply(&mut self, asset: &Asset) -> &mut Supply {
        let ledger = self.ledger;
        self.changes
            .supply
            .entry(asset.clone())
            .or_insert_with(|| ledger.supply(asset))
    }

    /// Credit funds that entered the exchange from outside.
    pub fn deposit(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        let deposited = self.staged_supply(asset).deposited.checked_add(amount)?;
        self.staged(account, asset).credit(amount)?;
        self.staged_supply(asset).deposited = deposited;
        Ok(())
    }

    /// Debit available funds that leave the exchange.
    pub fn withdraw(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        let withdrawn = self.staged_supply(asset).withdrawn.checked_add(amount)?;
        let balance = self.staged(account, asset);
        let available = balance.available();
        balance
            .debit(amount)
            .map_err(|e| insufficient(e, asset, amount, available))?;
        self.staged_supply(asset).withdrawn = withdrawn;
        Ok(())
    }

    /// Move available funds into escrow.
    pub fn lock(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        let balance = self.staged(account, asset);
        let available = balance.available();
        balance
            .lock(amount)
            .map_err(|e| insufficient(e, asset, amount, available))
    }

    /// Release escrow back to available.
    pub fn unlock(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        self.staged(account, asset).unlock(amount)?;
        Ok(())
    }

    /// Consume escrow that is paid to a counterparty.
    pub fn spend_escrow(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        self.staged(account, asset).spend_escrow(amount)?;
        Ok(())
    }

    /// Credit funds received from a counterparty.
    pub fn credit(&mut self, account: &AccountId, asset: &Asset, amount: Amount) -> ExchangeResult<()> {
        self.staged(account, asset).credit(amount)?;
        Ok(())
    }

    pub fn finish(self) -> StagedChanges {
        self.changes
    }
}

fn insufficient(error: NumericError, asset: &Asset, required: Amount, available: Amount) -> ExchangeError {
    match error {
        NumericError::Underflow => ExchangeError::InsufficientBalance {
            asset: asset.clone(),
            required,
            available,
        },
        other => ExchangeError::Arithmetic(other),
    }
}
