// ============================================================================
// Integer Units
// Price, volume and ledger amounts in the smallest indivisible unit
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Price of one token unit, in the smallest currency unit.
///
/// Ordering is the natural integer ordering, so a `BTreeMap<Price, _>`
/// iterates from the lowest to the highest price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Price(u64);

/// Token volume, in whole token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Volume(u64);

/// Ledger quantity of any asset (currency or token).
///
/// Wider than [`Price`] and [`Volume`] so that `price × volume` is always
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Amount(u128);

// ============================================================================
// Price
// ============================================================================

impl Price {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Exact notional of `volume` units at this price.
    #[inline]
    pub const fn notional(self, volume: Volume) -> Amount {
        Amount(self.0 as u128 * volume.0 as u128)
    }

    /// Price difference, `None` if `other` is above `self`.
    #[inline]
    pub fn checked_sub(self, other: Price) -> Option<Price> {
        self.0.checked_sub(other.0).map(Price)
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Volume
// ============================================================================

impl Volume {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn checked_add(self, other: Volume) -> NumericResult<Volume> {
        self.0
            .checked_add(other.0)
            .map(Volume)
            .ok_or(NumericError::Overflow)
    }

    #[inline]
    pub fn checked_sub(self, other: Volume) -> NumericResult<Volume> {
        self.0
            .checked_sub(other.0)
            .map(Volume)
            .ok_or(NumericError::Underflow)
    }

    /// Saturating subtraction, used for aggregates that are decremented by
    /// quantities already known to be contained in them.
    #[inline]
    pub fn saturating_sub(self, other: Volume) -> Volume {
        Volume(self.0.saturating_sub(other.0))
    }

    /// The volume as a ledger amount (token balances are held as amounts).
    #[inline]
    pub const fn as_amount(self) -> Amount {
        Amount(self.0 as u128)
    }
}

impl From<u64> for Volume {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Amount
// ============================================================================

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u128 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn checked_add(self, other: Amount) -> NumericResult<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(NumericError::Overflow)
    }

    #[inline]
    pub fn checked_sub(self, other: Amount) -> NumericResult<Amount> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(NumericError::Underflow)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<Volume> for Amount {
    fn from(volume: Volume) -> Self {
        volume.as_amount()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::iter::Sum for Amount {
    /// Saturates at `u128::MAX`; conservation checks compare the result
    /// against the tracked supply, which can never reach that bound.
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        Amount(iter.fold(0u128, |acc, a| acc.saturating_add(a.0)))
    }
}
