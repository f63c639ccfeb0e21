// ============================================================================
// Event Handler Interface
// Defines the contract for handling exchange events
// ============================================================================

use crate::domain::{AccountId, OrderId, Side, Symbol, Trade};
use crate::numeric::{Amount, Price, Volume};
use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the exchange.
///
/// Every successful state-changing call produces exactly one event; failed
/// calls produce none.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExchangeEvent {
    /// Native currency credited to an account
    CurrencyDeposited { account: AccountId, amount: Amount },

    /// Native currency paid out to an account
    CurrencyWithdrawn { account: AccountId, amount: Amount },

    /// Tokens pulled from the token contract and credited
    TokenDeposited {
        account: AccountId,
        symbol: Symbol,
        amount: Amount,
    },

    /// Tokens debited and sent back through the token contract
    TokenWithdrawn {
        account: AccountId,
        symbol: Symbol,
        amount: Amount,
    },

    /// A new symbol became tradable
    TokenRegistered { symbol: Symbol, address: AccountId },

    /// A buy order did not match and now rests in the book
    LimitBuyOrderCreated {
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        volume: Volume,
    },

    /// A sell order did not match and now rests in the book
    LimitSellOrderCreated {
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        volume: Volume,
    },

    /// An incoming buy order matched at least once; `remaining` rests
    BuyOrderFulfilled {
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        filled: Volume,
        remaining: Volume,
        trades: Vec<Trade>,
    },

    /// An incoming sell order matched at least once; `remaining` rests
    SellOrderFulfilled {
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        filled: Volume,
        remaining: Volume,
        trades: Vec<Trade>,
    },

    /// A resting buy order was cancelled and its escrow released
    BuyOrderCanceled {
        order_id: OrderId,
        symbol: Symbol,
        price: Price,
        released: Volume,
    },

    /// A resting sell order was cancelled and its escrow released
    SellOrderCanceled {
        order_id: OrderId,
        symbol: Symbol,
        price: Price,
        released: Volume,
    },
}

impl ExchangeEvent {
    /// Event name as published to subscribers
    pub fn name(&self) -> &'static str {
        match self {
            ExchangeEvent::CurrencyDeposited { .. } => "CurrencyDeposited",
            ExchangeEvent::CurrencyWithdrawn { .. } => "CurrencyWithdrawn",
            ExchangeEvent::TokenDeposited { .. } => "TokenDeposited",
            ExchangeEvent::TokenWithdrawn { .. } => "TokenWithdrawn",
            ExchangeEvent::TokenRegistered { .. } => "TokenRegistered",
            ExchangeEvent::LimitBuyOrderCreated { .. } => "LimitBuyOrderCreated",
            ExchangeEvent::LimitSellOrderCreated { .. } => "LimitSellOrderCreated",
            ExchangeEvent::BuyOrderFulfilled { .. } => "BuyOrderFulfilled",
            ExchangeEvent::SellOrderFulfilled { .. } => "SellOrderFulfilled",
            ExchangeEvent::BuyOrderCanceled { .. } => "BuyOrderCanceled",
            ExchangeEvent::SellOrderCanceled { .. } => "SellOrderCanceled",
        }
    }

    pub(crate) fn order_created(
        side: Side,
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        volume: Volume,
    ) -> Self {
        match side {
            Side::Buy => ExchangeEvent::LimitBuyOrderCreated {
                order_id,
                symbol,
                owner,
                price,
                volume,
            },
            Side::Sell => ExchangeEvent::LimitSellOrderCreated {
                order_id,
                symbol,
                owner,
                price,
                volume,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn order_fulfilled(
        side: Side,
        order_id: OrderId,
        symbol: Symbol,
        owner: AccountId,
        price: Price,
        filled: Volume,
        remaining: Volume,
        trades: Vec<Trade>,
    ) -> Self {
        match side {
            Side::Buy => ExchangeEvent::BuyOrderFulfilled {
                order_id,
                symbol,
                owner,
                price,
                filled,
                remaining,
                trades,
            },
            Side::Sell => ExchangeEvent::SellOrderFulfilled {
                order_id,
                symbol,
                owner,
                price,
                filled,
                remaining,
                trades,
            },
        }
    }

    pub(crate) fn order_canceled(
        side: Side,
        order_id: OrderId,
        symbol: Symbol,
        price: Price,
        released: Volume,
    ) -> Self {
        match side {
            Side::Buy => ExchangeEvent::BuyOrderCanceled {
                order_id,
                symbol,
                price,
                released,
            },
            Side::Sell => ExchangeEvent::SellOrderCanceled {
                order_id,
                symbol,
                price,
                released,
            },
        }
    }
}

/// Event handler trait for processing exchange events
/// Implementations can handle logging, notifications, persistence, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an exchange event
    fn on_event(&self, event: ExchangeEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<ExchangeEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: ExchangeEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: ExchangeEvent) {
        tracing::debug!(event = event.name(), "Exchange event: {:?}", event);
    }
}

/// Keeps every event it receives, in order.
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<ExchangeEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExchangeEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(ExchangeEvent::name).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: ExchangeEvent) {
        self.events.lock().push(event);
    }
}
