// ============================================================================
// Order Domain Model
// ============================================================================

use crate::domain::{AccountId, Symbol};
use crate::numeric::{Amount, NumericError, NumericResult, Price, Volume};
use chrono::{DateTime, Utc};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Stable integer order identifier, unique across the whole exchange.
///
/// Ids are handed out in submission order, so they also act as the
/// insertion sequence used for FIFO priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub fn next(&self) -> NumericResult<Self> {
        self.0.checked_add(1).map(Self).ok_or(NumericError::Overflow)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

// ============================================================================
// Order State Machine
// ============================================================================

pub mod state {
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderState {
        Open,
        PartiallyFilled,
        Filled,
        Cancelled,
    }

    impl OrderState {
        pub fn is_terminal(&self) -> bool {
            matches!(self, OrderState::Filled | OrderState::Cancelled)
        }

        pub fn can_be_cancelled(&self) -> bool {
            matches!(self, OrderState::Open | OrderState::PartiallyFilled)
        }
    }

    /// Valid state transitions for the order state machine
    #[derive(Debug, Clone, Copy)]
    pub enum OrderStateTransition {
        PartialFill,
        Fill,
        Cancel,
    }

    impl OrderState {
        pub fn transition(&self, transition: OrderStateTransition) -> Result<OrderState, String> {
            match (self, transition) {
                (OrderState::Open, OrderStateTransition::PartialFill) => {
                    Ok(OrderState::PartiallyFilled)
                },
                (OrderState::Open, OrderStateTransition::Fill) => Ok(OrderState::Filled),
                (OrderState::Open, OrderStateTransition::Cancel) => Ok(OrderState::Cancelled),

                (OrderState::PartiallyFilled, OrderStateTransition::PartialFill) => {
                    Ok(OrderState::PartiallyFilled)
                },
                (OrderState::PartiallyFilled, OrderStateTransition::Fill) => Ok(OrderState::Filled),
                (OrderState::PartiallyFilled, OrderStateTransition::Cancel) => {
                    Ok(OrderState::Cancelled)
                },

                _ => Err(format!(
                    "Invalid transition from {:?} via {:?}",
                    self, transition
                )),
            }
        }
    }
}

use state::{OrderState, OrderStateTransition};

// ============================================================================
// Order Entity
// ============================================================================

/// A resting limit order.
///
/// `remaining` only ever decreases: by fills, or to zero by cancellation.
/// Orders are never removed from their book's order store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    /// Volume at creation (what was left after the submitting call crossed)
    pub volume: Volume,
    pub timestamp: DateTime<Utc>,
    remaining: Volume,
    filled: Volume,
    state: OrderState,
}

impl Order {
    pub fn new(
        id: OrderId,
        owner: AccountId,
        symbol: Symbol,
        side: Side,
        price: Price,
        volume: Volume,
    ) -> Self {
        Self {
            id,
            owner,
            symbol,
            side,
            price,
            volume,
            timestamp: Utc::now(),
            remaining: volume,
            filled: Volume::ZERO,
            state: OrderState::Open,
        }
    }

    pub fn remaining(&self) -> Volume {
        self.remaining
    }

    pub fn filled(&self) -> Volume {
        self.filled
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.remaining.is_zero()
    }

    /// Escrow still held against this order.
    ///
    /// Buy orders hold `remaining × price` currency, sell orders hold
    /// `remaining` tokens.
    pub fn escrowed(&self) -> Amount {
        match self.side {
            Side::Buy => self.price.notional(self.remaining),
            Side::Sell => self.remaining.as_amount(),
        }
    }

    /// Fill `volume` of this order.
    ///
    /// # Errors
    /// Returns `Underflow` if `volume` exceeds the remaining volume; the
    /// order is left untouched.
    pub fn fill(&mut self, volume: Volume) -> NumericResult<()> {
        let remaining = self.remaining.checked_sub(volume)?;
        self.filled = self.filled.checked_add(volume)?;
        self.remaining = remaining;
        let transition = if remaining.is_zero() {
            OrderStateTransition::Fill
        } else {
            OrderStateTransition::PartialFill
        };
        if let Ok(next) = self.state.transition(transition) {
            self.state = next;
        }
        Ok(())
    }

    /// Zero the remaining volume in place and return what was released.
    ///
    /// Returns `None` if the order has nothing left to cancel.
    pub fn cancel(&mut self) -> Option<Volume> {
        if !self.state.can_be_cancelled() || self.remaining.is_zero() {
            return None;
        }
        let next = self.state.transition(OrderStateTransition::Cancel).ok()?;
        let released = self.remaining;
        self.remaining = Volume::ZERO;
        self.state = next;
        Some(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: Side, price: u64, volume: u64) -> Order {
        Order::new(
            OrderId::new(1),
            AccountId::from("0xalice"),
            Symbol::from("FIXED"),
            side,
            Price::new(price),
            Volume::new(volume),
        )
    }

    #[test]
    fn test_order_creation() {
        let order = order(Side::Buy, 3, 5);
        assert_eq!(order.remaining(), Volume::new(5));
        assert_eq!(order.filled(), Volume::ZERO);
        assert_eq!(order.state(), OrderState::Open);
        assert_eq!(order.escrowed(), Amount::new(15));
    }

    #[test]
    fn test_partial_then_full_fill() {
        let mut order = order(Side::Sell, 4, 10);

        order.fill(Volume::new(3)).unwrap();
        assert_eq!(order.remaining(), Volume::new(7));
        assert_eq!(order.filled(), Volume::new(3));
        assert_eq!(order.state(), OrderState::PartiallyFilled);
        assert_eq!(order.escrowed(), Amount::new(7));

        order.fill(Volume::new(2)).unwrap();
        assert_eq!(order.state(), OrderState::PartiallyFilled);

        order.fill(Volume::new(5)).unwrap();
        assert_eq!(order.state(), OrderState::Filled);
        assert!(!order.is_active());
    }

    #[test]
    fn test_overfill_protection() {
        let mut order = order(Side::Buy, 4, 5);
        assert!(order.fill(Volume::new(10)).is_err());
        assert_eq!(order.remaining(), Volume::new(5));
        assert_eq!(order.filled(), Volume::ZERO);
    }

    #[test]
    fn test_cancel_releases_remaining_once() {
        let mut order = order(Side::Buy, 4, 5);
        order.fill(Volume::new(2)).unwrap();

        assert_eq!(order.cancel(), Some(Volume::new(3)));
        assert_eq!(order.remaining(), Volume::ZERO);
        assert_eq!(order.state(), OrderState::Cancelled);
        assert_eq!(order.cancel(), None);
    }

    #[test]
    fn test_filled_order_cannot_be_cancelled() {
        let mut order = order(Side::Sell, 4, 5);
        order.fill(Volume::new(5)).unwrap();
        assert_eq!(order.cancel(), None);
        assert_eq!(order.state(), OrderState::Filled);
    }

    #[test]
    fn test_invalid_transition() {
        assert!(OrderState::Filled
            .transition(OrderStateTransition::Cancel)
            .is_err());
        assert!(OrderState::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_id_sequence() {
        assert_eq!(OrderId::new(1).next(), Ok(OrderId::new(2)));
        assert_eq!(OrderId::new(u64::MAX).next(), Err(NumericError::Overflow));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
