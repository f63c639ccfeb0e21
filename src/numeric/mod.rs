// ============================================================================
// Numeric Module
// Integer units for prices, volumes and ledger amounts
// ============================================================================
//
// This module provides:
// - Price / Volume: u64 newtypes used by orders and the book
// - Amount: u128 newtype used by the custody ledger
// - NumericError: Error type for checked arithmetic
//
// Design principles:
// - No floating-point operations
// - All fallible arithmetic returns Result (no panics)
// - price × volume is exact (u64 × u64 always fits in u128)

mod errors;
mod units;

pub use errors::{NumericError, NumericResult};
pub use units::{Amount, Price, Volume};
