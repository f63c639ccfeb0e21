// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod account;
pub mod config;
pub mod ids;
pub mod order;
pub mod order_book;
pub mod trade;

pub use account::{Account, Asset, Balance};
pub use config::ExchangeConfig;
pub use ids::{AccountId, Symbol};
pub use order::{Order, OrderId, Side};
pub use order_book::{BookSideSnapshot, OrderBookSide, OrderBookSnapshot, PriceLevel};
pub use trade::Trade;

// Re-export state machine
pub use order::state::{OrderState, OrderStateTransition};
