// ============================================================================
// Token Registry
// Symbol -> external token contract; gates every token operation
// ============================================================================

use crate::domain::{AccountId, Symbol};
use crate::error::{ExchangeError, ExchangeResult};
use crate::interfaces::{ExchangeEvent, TokenContract};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A registered token: its symbol, contract address and contract handle
#[derive(Clone)]
pub struct TokenRegistration {
    pub symbol: Symbol,
    pub address: AccountId,
    pub contract: Arc<dyn TokenContract>,
}

impl fmt::Debug for TokenRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRegistration")
            .field("symbol", &self.symbol)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Registered tokens, keyed by symbol. Registrations are never removed.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<Symbol, TokenRegistration>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `contract` under `symbol`.
    ///
    /// Only `owner` may register tokens.
    ///
    /// # Errors
    /// `Unauthorized` if `caller` is not `owner`, `DuplicateSymbol` if the
    /// symbol is taken.
    pub fn add_token(
        &mut self,
        caller: &AccountId,
        owner: &AccountId,
        symbol: Symbol,
        contract: Arc<dyn TokenContract>,
    ) -> ExchangeResult<ExchangeEvent> {
        if caller != owner {
            return Err(ExchangeError::Unauthorized {
                caller: caller.clone(),
            });
        }
        if self.tokens.contains_key(&symbol) {
            return Err(ExchangeError::DuplicateSymbol { symbol });
        }

        let address = contract.address().clone();
        self.tokens.insert(
            symbol.clone(),
            TokenRegistration {
                symbol: symbol.clone(),
                address: address.clone(),
                contract,
            },
        );
        Ok(ExchangeEvent::TokenRegistered { symbol, address })
    }

    pub fn has_token(&self, symbol: &str) -> bool {
        self.tokens.contains_key(symbol)
    }

    /// Look up a registration, failing with `UnknownToken`.
    pub fn resolve(&self, symbol: &str) -> ExchangeResult<&TokenRegistration> {
        self.tokens
            .get(symbol)
            .ok_or_else(|| ExchangeError::UnknownToken {
                symbol: Symbol::from(symbol),
            })
    }

    /// Registered symbols in sorted order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.tokens.keys()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Amount;
    use crate::token::FixedSupplyToken;

    fn owner() -> AccountId {
        AccountId::from("0xowner")
    }

    fn fixed() -> Arc<dyn TokenContract> {
        Arc::new(FixedSupplyToken::new(
            "0xfixed",
            "FIXED",
            &owner(),
            Amount::new(1_000_000),
        ))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = TokenRegistry::new();
        assert!(!registry.has_token("FIXED"));

        let event = registry
            .add_token(&owner(), &owner(), Symbol::from("FIXED"), fixed())
            .unwrap();
        assert_eq!(
            event,
            ExchangeEvent::TokenRegistered {
                symbol: Symbol::from("FIXED"),
                address: AccountId::from("0xfixed"),
            }
        );

        assert!(registry.has_token("FIXED"));
        assert_eq!(registry.resolve("FIXED").unwrap().address, AccountId::from("0xfixed"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_only_owner_registers() {
        let mut registry = TokenRegistry::new();
        let err = registry
            .add_token(&AccountId::from("0xmallory"), &owner(), Symbol::from("FIXED"), fixed())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Unauthorized { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut registry = TokenRegistry::new();
        registry
            .add_token(&owner(), &owner(), Symbol::from("FIXED"), fixed())
            .unwrap();
        let err = registry
            .add_token(&owner(), &owner(), Symbol::from("FIXED"), fixed())
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::DuplicateSymbol {
                symbol: Symbol::from("FIXED")
            }
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let registry = TokenRegistry::new();
        let err = registry.resolve("SOMETHING").unwrap_err();
        assert_eq!(err.to_string(), "Unknown token: SOMETHING");
    }

    #[test]
    fn test_symbols_sorted() {
        let mut registry = TokenRegistry::new();
        for symbol in ["ZED", "ABC", "FIXED"] {
            registry
                .add_token(&owner(), &owner(), Symbol::from(symbol), fixed())
                .unwrap();
        }
        let symbols: Vec<&str> = registry.symbols().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["ABC", "FIXED", "ZED"]);
    }
}
