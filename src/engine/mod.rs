// ============================================================================
// Engine Module
// Contains the exchange business logic: custody, registry and matching
// ============================================================================

mod custody_ledger;
mod exchange;
mod matching_engine;
mod price_time;
mod token_registry;

pub mod factory;

pub use custody_ledger::{CustodyLedger, LedgerBatch, StagedChanges, Supply};
pub use exchange::Exchange;
pub use factory::{create_from_config, ExchangeBuilder};
pub use matching_engine::MatchingEngine;
pub use price_time::PriceTimePriority;
pub use token_registry::{TokenRegistration, TokenRegistry};
