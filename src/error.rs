//! Exchange error taxonomy
//!
//! Every failing call is rejected as a whole: no balance, book or event
//! change is applied when one of these is returned.

use crate::domain::{AccountId, Asset, OrderId, Symbol};
use crate::numeric::{Amount, NumericError};
use thiserror::Error;

/// Errors surfaced by exchange operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Unknown token: {symbol}")]
    UnknownToken { symbol: Symbol },

    #[error("Token symbol already registered: {symbol}")]
    DuplicateSymbol { symbol: Symbol },

    #[error("Unauthorized: {caller} is not the exchange owner")]
    Unauthorized { caller: AccountId },

    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: &'static str },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient {asset} balance: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        required: Amount,
        available: Amount,
    },

    #[error("Transfer of {asset} rejected by the external contract")]
    TransferRejected { asset: Asset },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    #[error("Order {order_id} is not owned by {caller}")]
    NotOwner { order_id: OrderId, caller: AccountId },

    #[error("Ledger arithmetic error: {0}")]
    Arithmetic(#[from] NumericError),
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;
