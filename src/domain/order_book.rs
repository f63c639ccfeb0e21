// ============================================================================
// Order Book Domain Model
// ============================================================================

use crate::numeric::{NumericResult, Price, Volume};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};

use super::{OrderId, Side, Symbol};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Price Level
// ============================================================================

/// All resting orders at one price on one side of the book.
///
/// The queue holds order ids in insertion order. Orders that were filled or
/// cancelled stay in the queue at zero volume; matching walks past them.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Price,
    /// FIFO queue of order ids
    orders: VecDeque<OrderId>,
    /// Aggregate remaining volume at this price level
    total_volume: Volume,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: Volume::ZERO,
        }
    }

    /// Append an order at the tail of the queue.
    pub fn add_order(&mut self, order_id: OrderId, volume: Volume) -> NumericResult<()> {
        self.total_volume = self.total_volume.checked_add(volume)?;
        self.orders.push_back(order_id);
        Ok(())
    }

    pub fn total_volume(&self) -> Volume {
        self.total_volume
    }

    /// Reduce the aggregate after a fill or cancellation of a queued order.
    pub fn subtract_volume(&mut self, volume: Volume) {
        self.total_volume = self.total_volume.saturating_sub(volume);
    }

    /// Order ids in time priority.
    pub fn order_ids(&self) -> impl Iterator<Item = &OrderId> + '_ {
        self.orders.iter()
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains(order_id)
    }

    /// Number of queued entries, including zero-volume ones.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ============================================================================
// Order Book Side
// ============================================================================

/// One side (bids or asks) of a symbol's book.
///
/// Levels are keyed by price in a `BTreeMap`, so iteration is ascending.
/// The best bid is the last key, the best ask the first.
#[derive(Debug, Clone)]
pub struct OrderBookSide {
    levels: BTreeMap<Price, PriceLevel>,
    pub side: Side,
}

impl OrderBookSide {
    pub fn new(side: Side) -> Self {
        Self {
            levels: BTreeMap::new(),
            side,
        }
    }

    /// Add an order at the tail of its price level, creating the level if absent.
    pub fn add_order(&mut self, order_id: OrderId, price: Price, volume: Volume) -> NumericResult<()> {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add_order(order_id, volume)
    }

    /// Get the best (top-of-book) price
    pub fn best_price(&self) -> Option<Price> {
        self.best_level().map(|level| level.price)
    }

    /// Get the best price level
    pub fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    /// Levels in matching priority: highest first for bids, lowest first for asks.
    pub fn levels_by_priority(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Unlink a level from the side. Its orders stay in the order store.
    pub fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Every level, ascending by price, including zero-volume levels.
    pub fn snapshot(&self) -> BookSideSnapshot {
        let (prices, volumes) = self
            .levels
            .values()
            .map(|level| (level.price, level.total_volume()))
            .unzip();
        BookSideSnapshot { prices, volumes }
    }

    /// Get depth at N levels holding volume, best first
    pub fn get_depth(&self, num_levels: usize) -> Vec<(Price, Volume)> {
        self.levels_by_priority()
            .filter(|level| !level.total_volume().is_zero())
            .take(num_levels)
            .map(|level| (level.price, level.total_volume()))
            .collect()
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Price/volume arrays for one side, ascending by price and index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookSideSnapshot {
    pub prices: Vec<Price>,
    pub volumes: Vec<Volume>,
}

impl BookSideSnapshot {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn volume_at(&self, price: Price) -> Option<Volume> {
        self.prices
            .iter()
            .position(|p| *p == price)
            .map(|index| self.volumes[index])
    }
}

/// Two-sided market depth of one symbol.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    /// Bid levels (price, volume), best first
    pub bids: Vec<(Price, Volume)>,
    /// Ask levels (price, volume), best first
    pub asks: Vec<(Price, Volume)>,
    /// Current spread (ask - bid)
    pub spread: Option<Price>,
    /// Mid price
    pub mid_price: Option<Decimal>,
}

impl OrderBookSnapshot {
    pub fn with_depth(
        symbol: Symbol,
        bids: Vec<(Price, Volume)>,
        asks: Vec<(Price, Volume)>,
    ) -> Self {
        let top = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => Some((*bid, *ask)),
            _ => None,
        };

        let spread = top.and_then(|(bid, ask)| ask.checked_sub(bid));
        let mid_price = top.map(|(bid, ask)| {
            (Decimal::from(bid.value()) + Decimal::from(ask.value())) / Decimal::from(2)
        });

        Self {
            symbol,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|(price, _)| *price)
    }
}
