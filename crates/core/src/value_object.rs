//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. Two value objects with the same values are
//! the same value. `Money` is the one every module shares.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Basis points in one whole (100%).
pub const BPS_SCALE: u32 = 10_000;

/// Monetary amount in the smallest currency unit (cents).
///
/// Integer cents keep sums, commissions and discounts exact; percentages are
/// expressed in basis points and rounded half-up to the cent.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole units plus cents, e.g. `Money::new(15, 90)` is 15.90.
    pub const fn new(units: u64, cents: u64) -> Self {
        Self(units * 100 + cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Price times quantity (line subtotal).
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// `self × bps / 10000`, rounded half-up to the cent.
    pub fn apply_rate(self, bps: u32) -> Self {
        let scaled = u128::from(self.0) * u128::from(bps) + u128::from(BPS_SCALE / 2);
        let cents = scaled / u128::from(BPS_SCALE);
        Self(u64::try_from(cents).unwrap_or(u64::MAX))
    }

    pub fn saturating_sub(self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl core::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
