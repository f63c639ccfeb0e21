// ============================================================================
// Matching Algorithm Interface
// Defines the contract for pluggable matching algorithms
// ============================================================================

use crate::domain::{AccountId, Order, OrderBookSide, OrderId, Side};
use crate::numeric::{Price, Volume};
use std::collections::HashMap;

/// The parameters of an incoming limit order, before it has an id in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingOrder {
    pub side: Side,
    pub price: Price,
    pub volume: Volume,
}

/// One planned execution against a resting order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub maker_order_id: OrderId,
    pub maker: AccountId,
    /// The maker's price, which is the execution price
    pub price: Price,
    pub volume: Volume,
}

/// Result of planning a crossing without mutating the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPlan {
    /// Executions in the order they happen
    pub fills: Vec<Fill>,
    /// Opposite-side levels whose aggregate volume is zero once the fills apply
    pub exhausted_levels: Vec<Price>,
    /// Incoming volume left after crossing
    pub remaining: Volume,
}

impl MatchPlan {
    pub fn unmatched(volume: Volume) -> Self {
        Self {
            fills: Vec::new(),
            exhausted_levels: Vec::new(),
            remaining: volume,
        }
    }

    pub fn has_fills(&self) -> bool {
        !self.fills.is_empty()
    }
}

/// Strategy pattern interface for matching algorithms
pub trait MatchingAlgorithm: Send + Sync {
    /// Plan the crossing of an incoming order against the opposite side of the book
    ///
    /// # Arguments
    /// * `incoming` - The new order to match
    /// * `opposite_side` - The opposite side of the order book
    /// * `orders` - Order store the side's queues refer to
    ///
    /// # Returns
    /// The fills and level removals that would result; nothing is applied
    fn plan_match(
        &self,
        incoming: &IncomingOrder,
        opposite_side: &OrderBookSide,
        orders: &HashMap<OrderId, Order>,
    ) -> MatchPlan;

    /// Get the algorithm name for logging
    fn name(&self) -> &str;

    /// Check if an incoming limit crosses a resting price
    /// Default implementation handles buy/sell logic
    fn prices_cross(&self, incoming: &IncomingOrder, book_price: Price) -> bool {
        match incoming.side {
            Side::Buy => incoming.price >= book_price,
            Side::Sell => incoming.price <= book_price,
        }
    }
}
