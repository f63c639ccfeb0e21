// ============================================================================
// Account Domain Model
// Per-asset balances with escrow
// ============================================================================

use crate::domain::Symbol;
use crate::numeric::{Amount, NumericResult};
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An asset held in custody: the native currency or a registered token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Asset {
    Currency,
    Token(Symbol),
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Currency => f.write_str("currency"),
            Asset::Token(symbol) => write!(f, "token {}", symbol),
        }
    }
}

/// Balance of one asset for one account.
///
/// # Invariants
/// - `available + escrowed` never overflows and is never negative
/// - every mutation is checked; a failed mutation leaves the balance unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Balance {
    available: Amount,
    escrowed: Amount,
}

impl Balance {
    pub const fn new(available: Amount, escrowed: Amount) -> Self {
        Self {
            available,
            escrowed,
        }
    }

    /// Funds free for withdrawal or new orders
    pub const fn available(&self) -> Amount {
        self.available
    }

    /// Funds locked against open orders
    pub const fn escrowed(&self) -> Amount {
        self.escrowed
    }

    pub fn total(&self) -> NumericResult<Amount> {
        self.available.checked_add(self.escrowed)
    }

    /// Add to the available balance.
    pub fn credit(&mut self, amount: Amount) -> NumericResult<()> {
        self.available = self.available.checked_add(amount)?;
        Ok(())
    }

    /// Remove from the available balance.
    pub fn debit(&mut self, amount: Amount) -> NumericResult<()> {
        self.available = self.available.checked_sub(amount)?;
        Ok(())
    }

    /// Move funds from available into escrow.
    pub fn lock(&mut self, amount: Amount) -> NumericResult<()> {
        let available = self.available.checked_sub(amount)?;
        let escrowed = self.escrowed.checked_add(amount)?;
        self.available = available;
        self.escrowed = escrowed;
        Ok(())
    }

    /// Move funds from escrow back to available.
    pub fn unlock(&mut self, amount: Amount) -> NumericResult<()> {
        let escrowed = self.escrowed.checked_sub(amount)?;
        let available = self.available.checked_add(amount)?;
        self.available = available;
        self.escrowed = escrowed;
        Ok(())
    }

    /// Remove escrowed funds (they leave this balance as part of a trade).
    pub fn spend_escrow(&mut self, amount: Amount) -> NumericResult<()> {
        self.escrowed = self.escrowed.checked_sub(amount)?;
        Ok(())
    }
}

/// Everything the exchange holds for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Account {
    pub currency: Balance,
    pub tokens: HashMap<Symbol, Balance>,
}

impl Account {
    pub fn balance(&self, asset: &Asset) -> Balance {
        match asset {
            Asset::Currency => self.currency,
            Asset::Token(symbol) => self.tokens.get(symbol).copied().unwrap_or_default(),
        }
    }

    pub fn balance_mut(&mut self, asset: &Asset) -> &mut Balance {
        match asset {
            Asset::Currency => &mut self.currency,
            Asset::Token(symbol) => self.tokens.entry(symbol.clone()).or_default(),
        }
    }
}
