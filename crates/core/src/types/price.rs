//! Type-safe money representation using decimal arithmetic.
//!
//! All storefront amounts are USD and are kept as exact base-10 decimals, so
//! repeated additions never drift. Rounding to cents happens only when an
//! amount is formatted for display.
//!
//! The arithmetic operators saturate at the bounds of `Decimal` instead of
//! panicking. Use the `checked_*` methods where overflow must be detected.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in the store currency (USD).
///
/// Serializes as a JSON number (e.g. `49.99`) to stay compatible with the
/// persisted cart layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "$";

    /// Create an amount from a decimal value in dollars.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from an integer number of cents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_cents(cents: i64) -> Self {
        let magnitude = cents.unsigned_abs();
        Self(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            cents < 0,
            2,
        ))
    }

    /// The exact decimal amount in dollars.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a decimal factor (e.g. a tax rate).
    #[must_use]
    pub fn scaled(self, factor: Decimal) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// `self + rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `self * quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Round to whole cents, half away from zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-{}{:.2}", Self::SYMBOL, rounded.abs())
        } else {
            write!(f, "{}{:.2}", Self::SYMBOL, rounded.abs())
        }
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

/// Percentage saved going from `original` to `current`, rounded to a whole
/// percent (half away from zero).
///
/// Returns 0 when `original` is not positive.
///
/// ```
/// use greenshop_core::{Money, discount_percent};
///
/// assert_eq!(discount_percent(Money::from_cents(6999), Money::from_cents(4999)), 29);
/// ```
#[must_use]
pub fn discount_percent(original: Money, current: Money) -> i64 {
    if original.0 <= Decimal::ZERO {
        return 0;
    }

    original
        .0
        .checked_sub(current.0)
        .and_then(|saved| saved.checked_div(original.0))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| {
            percent
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .unwrap_or(0)
}
