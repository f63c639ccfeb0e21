// ============================================================================
// Token Exchange Library
// Custodial exchange: custody ledger, token registry and limit order books
// ============================================================================

//! # Token Exchange
//!
//! A custodial exchange that holds native currency and registered token
//! balances for its accounts and matches limit orders per symbol.
//!
//! ## Features
//!
//! - **Custody ledger** with escrow and staged atomic batches
//! - **Price/time priority matching** with partial fills at the resting price
//! - **Pluggable matching algorithms** behind the `MatchingAlgorithm` trait
//! - **One event per call** forwarded to an `EventHandler`
//! - **Exact integer arithmetic**: `price × volume` never rounds or wraps
//!
//! ## Example
//!
//! ```rust
//! use token_exchange::prelude::*;
//! use std::sync::Arc;
//!
//! let owner = AccountId::from("0xowner");
//! let mut exchange = ExchangeBuilder::new("0xowner", "0xexchange")
//!     .build(Arc::new(HostWallet::new()))
//!     .unwrap();
//!
//! // Register a token and fund a seller through its allowance
//! let token = Arc::new(FixedSupplyToken::new("0xfixed", "FIXED", &owner, Amount::new(1_000_000)));
//! exchange.add_token(&owner, "FIXED", token.clone()).unwrap();
//! token.approve(&owner, exchange.address(), Amount::new(10));
//! exchange.deposit_token(&owner, "FIXED", Amount::new(10)).unwrap();
//!
//! // Ask 5 @ 4, then a buyer lifts it
//! let buyer = AccountId::from("0xbuyer");
//! exchange.deposit_currency(&buyer, Amount::new(20)).unwrap();
//! exchange.submit_order(&owner, "FIXED", Side::Sell, Price::new(4), Volume::new(5)).unwrap();
//! let events = exchange
//!     .submit_order(&buyer, "FIXED", Side::Buy, Price::new(4), Volume::new(5))
//!     .unwrap();
//!
//! assert_eq!(events[0].name(), "BuyOrderFulfilled");
//! assert_eq!(exchange.get_token_balance(&buyer, "FIXED").unwrap(), Amount::new(5));
//! assert_eq!(exchange.get_currency_balance(&owner), Amount::new(20));
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod numeric;
pub mod token;

#[cfg(feature = "logging")]
pub mod logging;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::order::state::{OrderState, OrderStateTransition};
    pub use crate::domain::{
        AccountId, Asset, Balance, BookSideSnapshot, ExchangeConfig, Order, OrderBookSide,
        OrderBookSnapshot, OrderId, Side, Symbol, Trade,
    };
    pub use crate::engine::{
        create_from_config, Exchange, ExchangeBuilder, MatchingEngine, PriceTimePriority,
    };
    pub use crate::error::{ExchangeError, ExchangeResult};
    pub use crate::interfaces::{
        EventHandler, ExchangeEvent, LoggingEventHandler, MatchingAlgorithm, NativeCurrency,
        NoOpEventHandler, RecordingEventHandler, TokenContract,
    };
    pub use crate::numeric::{Amount, Price, Volume};
    pub use crate::token::{FixedSupplyToken, HostWallet};
}
