// ============================================================================
// Matching Engine
// Per-symbol order book: plans crossings, applies them, rests and cancels
// ============================================================================

use crate::domain::{
    AccountId, BookSideSnapshot, Order, OrderBookSide, OrderBookSnapshot, OrderId, Side, Symbol,
};
use crate::error::{ExchangeError, ExchangeResult};
use crate::interfaces::{IncomingOrder, MatchPlan, MatchingAlgorithm};
use crate::numeric::{Amount, NumericError, NumericResult, Price, Volume};
use std::collections::HashMap;
use std::sync::Arc;

/// Order book of one symbol with a pluggable matching algorithm.
///
/// The engine never touches balances. The exchange plans a crossing here,
/// settles it in the custody ledger, and only then calls [`apply`](Self::apply).
pub struct MatchingEngine {
    /// Traded symbol
    symbol: Symbol,

    /// Bid side of the order book
    bids: OrderBookSide,

    /// Ask side of the order book
    asks: OrderBookSide,

    /// Every order that ever rested here, by id
    orders: HashMap<OrderId, Order>,

    /// Pluggable matching algorithm
    algorithm: Arc<dyn MatchingAlgorithm>,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new(symbol: Symbol, algorithm: Arc<dyn MatchingAlgorithm>) -> Self {
        Self {
            symbol,
            bids: OrderBookSide::new(Side::Buy),
            asks: OrderBookSide::new(Side::Sell),
            orders: HashMap::new(),
            algorithm,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// The side of the book holding orders of `side`
    pub fn book(&self, side: Side) -> &OrderBookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn book_mut(&mut self, side: Side) -> &mut OrderBookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Plan the crossing of `incoming` against the opposite side. Read-only.
    pub fn plan(&self, incoming: &IncomingOrder) -> MatchPlan {
        let plan = self
            .algorithm
            .plan_match(incoming, self.book(incoming.side.opposite()), &self.orders);
        tracing::debug!(
            symbol = %self.symbol,
            side = %incoming.side,
            price = %incoming.price,
            fills = plan.fills.len(),
            remaining = %plan.remaining,
            algorithm = self.algorithm.name(),
            "planned crossing"
        );
        plan
    }

    /// Apply a plan produced by [`plan`](Self::plan) and rest `remainder`, if any.
    ///
    /// Everything is checked before the first mutation, so an error leaves
    /// the book untouched.
    pub fn apply(&mut self, plan: &MatchPlan, taker_side: Side, remainder: Option<Order>) -> NumericResult<()> {
        let maker_side = taker_side.opposite();

        for fill in &plan.fills {
            let maker = self
                .orders
                .get(&fill.maker_order_id)
                .ok_or(NumericError::Underflow)?;
            maker.remaining().checked_sub(fill.volume)?;
        }
        if let Some(order) = &remainder {
            self.check_can_rest(order.side, order.price, order.remaining())?;
        }

        for fill in &plan.fills {
            if let Some(maker) = self.orders.get_mut(&fill.maker_order_id) {
                maker.fill(fill.volume)?;
            }
            if let Some(level) = self.book_mut(maker_side).level_mut(fill.price) {
                level.subtract_volume(fill.volume);
            }
        }
        for price in &plan.exhausted_levels {
            self.book_mut(maker_side).remove_level(*price);
        }

        if let Some(order) = remainder {
            self.rest(order)?;
        }
        Ok(())
    }

    /// Check that `volume` more at `price` fits in the level's aggregate.
    pub fn check_can_rest(&self, side: Side, price: Price, volume: Volume) -> NumericResult<()> {
        let level_volume = self
            .book(side)
            .level(price)
            .map(|level| level.total_volume())
            .unwrap_or(Volume::ZERO);
        level_volume.checked_add(volume).map(|_| ())
    }

    fn rest(&mut self, order: Order) -> NumericResult<()> {
        let (id, price, volume) = (order.id, order.price, order.remaining());
        self.book_mut(order.side).add_order(id, price, volume)?;
        tracing::debug!(symbol = %self.symbol, order_id = %id, side = %order.side, %price, %volume, "order rests");
        self.orders.insert(id, order);
        Ok(())
    }

    /// Find an order that `caller` may cancel at `price` on `side`.
    ///
    /// # Errors
    /// `OrderNotFound` if no order with remaining volume is queued there,
    /// `NotOwner` if it belongs to someone else.
    pub fn find_cancelable(
        &self,
        caller: &AccountId,
        side: Side,
        price: Price,
        order_id: OrderId,
    ) -> ExchangeResult<&Order> {
        let queued = self
            .book(side)
            .level(price)
            .is_some_and(|level| level.contains(&order_id));
        let order = self
            .orders
            .get(&order_id)
            .filter(|order| queued && order.is_active())
            .ok_or(ExchangeError::OrderNotFound { order_id })?;

        if &order.owner != caller {
            return Err(ExchangeError::NotOwner {
                order_id,
                caller: caller.clone(),
            });
        }
        Ok(order)
    }

    /// Zero an order's remaining volume in place.
    ///
    /// The order keeps its queue position and the level stays even when its
    /// aggregate drops to zero. Returns the released volume.
    pub fn cancel(&mut self, order_id: OrderId) -> Option<Volume> {
        let order = self.orders.get_mut(&order_id)?;
        let (side, price) = (order.side, order.price);
        let released = order.cancel()?;
        if let Some(level) = self.book_mut(side).level_mut(price) {
            level.subtract_volume(released);
        }
        Some(released)
    }

    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Prices and volumes of every level of one side, ascending by price
    pub fn snapshot(&self, side: Side) -> BookSideSnapshot {
        self.book(side).snapshot()
    }

    /// Get order book snapshot
    pub fn market_depth(&self, depth: usize) -> OrderBookSnapshot {
        let bids = self.bids.get_depth(depth);
        let asks = self.asks.get_depth(depth);

        OrderBookSnapshot::with_depth(self.symbol.clone(), bids, asks)
    }

    /// Escrow held by resting orders of `side`: currency for bids, tokens for asks
    pub fn escrow_held(&self, side: Side) -> Amount {
        self.orders
            .values()
            .filter(|order| order.side == side)
            .map(Order::escrowed)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PriceTimePriority;

    fn engine() -> MatchingEngine {
        MatchingEngine::new(Symbol::from("FIXED"), Arc::new(PriceTimePriority::new()))
    }

    fn order(id: u64, owner: &str, side: Side, price: u64, volume: u64) -> Order {
        Order::new(
            OrderId::new(id),
            AccountId::from(owner),
            Symbol::from("FIXED"),
            side,
            Price::new(price),
            Volume::new(volume),
        )
    }

    fn incoming(side: Side, price: u64, volume: u64) -> IncomingOrder {
        IncomingOrder {
            side,
            price: Price::new(price),
            volume: Volume::new(volume),
        }
    }

    fn rest(engine: &mut MatchingEngine, order: Order) {
        let plan = MatchPlan::unmatched(order.volume);
        let side = order.side;
        engine.apply(&plan, side, Some(order)).unwrap();
    }

    #[test]
    fn test_rest_and_snapshot() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xa", Side::Buy, 3, 5));
        rest(&mut engine, order(2, "0xb", Side::Buy, 3, 2));
        rest(&mut engine, order(3, "0xc", Side::Buy, 1, 4));

        let snapshot = engine.snapshot(Side::Buy);
        assert_eq!(snapshot.prices, vec![Price::new(1), Price::new(3)]);
        assert_eq!(snapshot.volumes, vec![Volume::new(4), Volume::new(7)]);
        assert!(engine.snapshot(Side::Sell).is_empty());
    }

    #[test]
    fn test_full_match_unlinks_level() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xseller", Side::Sell, 4, 5));

        let plan = engine.plan(&incoming(Side::Buy, 4, 5));
        assert_eq!(plan.remaining, Volume::ZERO);
        engine.apply(&plan, Side::Buy, None).unwrap();

        assert!(engine.snapshot(Side::Sell).is_empty());
        assert!(engine.snapshot(Side::Buy).is_empty());
        let maker = engine.get_order(OrderId::new(1)).unwrap();
        assert_eq!(maker.remaining(), Volume::ZERO);
        assert_eq!(maker.filled(), Volume::new(5));
    }

    #[test]
    fn test_partial_match_rests_remainder() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xseller", Side::Sell, 4, 2));

        let plan = engine.plan(&incoming(Side::Buy, 5, 5));
        let remainder = order(2, "0xbuyer", Side::Buy, 5, plan.remaining.value());
        engine.apply(&plan, Side::Buy, Some(remainder)).unwrap();

        assert!(engine.snapshot(Side::Sell).is_empty());
        assert_eq!(engine.snapshot(Side::Buy).volume_at(Price::new(5)), Some(Volume::new(3)));
        let depth = engine.market_depth(5);
        assert_eq!(depth.best_bid(), Some(Price::new(5)));
        assert_eq!(depth.best_ask(), None);
    }

    #[test]
    fn test_cancel_keeps_level_at_zero() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xa", Side::Sell, 4, 5));

        let caller = AccountId::from("0xa");
        let id = engine
            .find_cancelable(&caller, Side::Sell, Price::new(4), OrderId::new(1))
            .unwrap()
            .id;
        assert_eq!(engine.cancel(id), Some(Volume::new(5)));

        let snapshot = engine.snapshot(Side::Sell);
        assert_eq!(snapshot.prices, vec![Price::new(4)]);
        assert_eq!(snapshot.volumes, vec![Volume::ZERO]);

        // Nothing left to cancel
        let err = engine
            .find_cancelable(&caller, Side::Sell, Price::new(4), id)
            .unwrap_err();
        assert_eq!(err, ExchangeError::OrderNotFound { order_id: id });
    }

    #[test]
    fn test_find_cancelable_checks_location_and_owner() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xa", Side::Buy, 3, 5));
        let id = OrderId::new(1);

        let wrong_price = engine.find_cancelable(&AccountId::from("0xa"), Side::Buy, Price::new(4), id);
        assert!(matches!(wrong_price, Err(ExchangeError::OrderNotFound { .. })));

        let wrong_side = engine.find_cancelable(&AccountId::from("0xa"), Side::Sell, Price::new(3), id);
        assert!(matches!(wrong_side, Err(ExchangeError::OrderNotFound { .. })));

        let stranger = engine.find_cancelable(&AccountId::from("0xb"), Side::Buy, Price::new(3), id);
        assert!(matches!(stranger, Err(ExchangeError::NotOwner { .. })));
    }

    #[test]
    fn test_apply_rejects_overfull_level_without_mutation() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xa", Side::Buy, 3, u64::MAX));
        rest(&mut engine, order(2, "0xb", Side::Sell, 9, 1));

        let plan = engine.plan(&incoming(Side::Buy, 3, 1));
        let err = engine
            .apply(&plan, Side::Buy, Some(order(3, "0xc", Side::Buy, 3, 1)))
            .unwrap_err();
        assert_eq!(err, NumericError::Overflow);
        assert_eq!(engine.order_count(), 2);
        assert_eq!(engine.snapshot(Side::Buy).volumes, vec![Volume::new(u64::MAX)]);
    }

    #[test]
    fn test_escrow_held() {
        let mut engine = engine();
        rest(&mut engine, order(1, "0xa", Side::Buy, 3, 5));
        rest(&mut engine, order(2, "0xb", Side::Sell, 7, 2));

        assert_eq!(engine.escrow_held(Side::Buy), Amount::new(15));
        assert_eq!(engine.escrow_held(Side::Sell), Amount::new(2));
    }
}
