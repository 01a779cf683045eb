//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In binary floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  Repeated cart additions drift one cent at a time until the         │
//! │  displayed total no longer matches the sum of the lines.            │
//! │                                                                     │
//! │  OUR SOLUTION: integer minor units (cents)                          │
//! │    every total is exactly the sum of its line totals, always        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tissu_core::money::Money;
//! use tissu_core::types::Quantity;
//!
//! let price = Money::from_cents(1000); // 10.00 per meter
//! let total = price.line_total(Quantity::from_units(3));
//! assert_eq!(total.cents(), 3000);     // 30.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::types::Quantity;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for refunds and corrections
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: amounts enter the system as integers only
///
/// Every monetary value in the system flows through this type:
/// `Product.price_cents → CartLine.unit_price → line_total → Cart.total`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tissu_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion (e.g. 10 for 10.99).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion, always 0-99.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Computes a line total: `unit price × quantity`.
    ///
    /// ## Fractional Quantities
    /// Quantities are fixed-point hundredths of a unit (see [`Quantity`]),
    /// so the raw product is in ten-thousandths of a currency unit. We
    /// divide back to cents with half-up rounding, using i128 intermediates
    /// so large carts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tissu_core::money::Money;
    /// use tissu_core::types::Quantity;
    ///
    /// let per_meter = Money::from_cents(1050); // 10.50 per meter
    /// let qty = Quantity::from_hundredths(250); // 2.50 meters
    /// assert_eq!(per_meter.line_total(qty).cents(), 2625); // 26.25
    /// ```
    pub fn line_total(&self, quantity: Quantity) -> Money {
        let raw = self.0 as i128 * quantity.hundredths() as i128;
        // raw is cents × hundredths; +50 rounds the division half up
        let cents = (raw + 50) / 100;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display: "10.99", "-5.50".
///
/// Currency symbol and locale are a presentation concern; callers format
/// amounts for end users themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values (cart totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_and_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);
    }

    #[test]
    fn sum_of_lines() {
        let total: Money = [100, 250, 399]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 749);
    }

    #[test]
    fn line_total_whole_quantity() {
        let price = Money::from_cents(1000); // 10.00
        let total = price.line_total(Quantity::from_units(3));
        assert_eq!(total.cents(), 3000); // 30.00
    }

    #[test]
    fn line_total_fractional_quantity() {
        let price = Money::from_cents(1050); // 10.50 per meter
        let total = price.line_total(Quantity::from_hundredths(250)); // 2.50 m
        assert_eq!(total.cents(), 2625); // 26.25
    }

    #[test]
    fn line_total_rounds_half_up() {
        // 9.99 × 0.50... not reachable (min 1 unit), use 1.50: 9.99 × 1.5 = 14.985 → 14.99
        let price = Money::from_cents(999);
        let total = price.line_total(Quantity::from_hundredths(150));
        assert_eq!(total.cents(), 1499);
    }

    #[test]
    fn zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());
        assert!(!Money::from_cents(-100).is_positive());
    }
}
