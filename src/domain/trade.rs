// ============================================================================
// Trade Domain Model
// ============================================================================

use crate::domain::{AccountId, Symbol};
use crate::numeric::{Amount, Price, Volume};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a matched trade between an incoming order and a resting one
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Unique trade identifier
    pub id: Uuid,

    /// Traded symbol
    pub symbol: Symbol,

    /// Order ID of the passive order (resting in book)
    pub maker_order_id: OrderId,

    /// Order ID of the aggressive order (incoming); the incoming order only
    /// gets an id of its own, it rests under that id if a remainder is left
    pub taker_order_id: OrderId,

    /// Owner of the resting order
    pub maker: AccountId,

    /// Owner of the incoming order
    pub taker: AccountId,

    /// Side of the incoming order
    pub taker_side: Side,

    /// Execution price (always the maker's price)
    pub price: Price,

    /// Executed volume
    pub volume: Volume,

    /// Trade timestamp
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker: AccountId,
        taker: AccountId,
        taker_side: Side,
        price: Price,
        volume: Volume,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol,
            maker_order_id,
            taker_order_id,
            maker,
            taker,
            taker_side,
            price,
            volume,
            timestamp: Utc::now(),
        }
    }

    /// Currency that changes hands: price × volume, computed exactly.
    pub fn notional_value(&self) -> Amount {
        self.price.notional(self.volume)
    }

    pub fn buyer(&self) -> &AccountId {
        match self.taker_side {
            Side::Buy => &self.taker,
            Side::Sell => &self.maker,
        }
    }

    pub fn seller(&self) -> &AccountId {
        match self.taker_side {
            Side::Buy => &self.maker,
            Side::Sell => &self.taker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(taker_side: Side) -> Trade {
        Trade::new(
            Symbol::from("FIXED"),
            OrderId::new(1),
            OrderId::new(2),
            AccountId::from("0xmaker"),
            AccountId::from("0xtaker"),
            taker_side,
            Price::new(4),
            Volume::new(5),
        )
    }

    #[test]
    fn test_trade_creation() {
        let trade = trade(Side::Buy);

        assert_eq!(trade.symbol.as_str(), "FIXED");
        assert_eq!(trade.price, Price::new(4));
        assert_eq!(trade.volume, Volume::new(5));
        assert_eq!(trade.notional_value(), Amount::new(20));
    }

    #[test]
    fn test_buyer_and_seller_follow_taker_side() {
        let taker_buys = trade(Side::Buy);
        assert_eq!(taker_buys.buyer().as_str(), "0xtaker");
        assert_eq!(taker_buys.seller().as_str(), "0xmaker");

        let taker_sells = trade(Side::Sell);
        assert_eq!(taker_sells.buyer().as_str(), "0xmaker");
        assert_eq!(taker_sells.seller().as_str(), "0xtaker");
    }
}
