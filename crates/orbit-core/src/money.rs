//! # Money Module
//!
//! `Money` for monetary values and `Percent` for discount/savings ratios.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing combo constituents in floating point:                          │
//! │    4.10 + 5.20 = 9.299999999999999  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    410 + 520 = 930 cents, always                                       │
//! │                                                                         │
//! │  Percentages use basis points: 2000 bps = 20.00%                       │
//! │  Two decimal places is exactly one basis point of resolution.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orbit_core::money::{Money, Percent};
//!
//! let original = Money::from_cents(2500); // $25.00
//! let offer = Money::from_cents(2000);    // $20.00
//!
//! let savings = Percent::reduction(original, offer);
//! assert_eq!(savings.bps(), 2000);        // 20.00%
//! assert_eq!(savings.to_string(), "20.00%");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► final_price ──┬──► Combo.total_original_price
///                                 │
///                                 └──► CartLine.unit_price ──► Cart.total
///                                                                  │
///                               Transaction.total ◄── line snapshot ┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use orbit_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use orbit_core::money::Money;
    ///
    /// let combo = Money::from_cents(2000);
    /// assert_eq!(combo.multiply_quantity(5).cents(), 10000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats with an arbitrary currency symbol, e.g. `₹12.50`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Display shows dollars, e.g. `$10.99`. Front ends localize on their own.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// Combo discount and savings figures are always non-negative: a computation
/// that would go below zero, or divide by a zero base, yields `Percent::zero()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Returns the value in basis points (2000 = 20.00%).
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Percentage for display only (2000 bps → 20.0).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Relative reduction going from `from` to `to`, i.e. `(from - to) / from`.
    ///
    /// Rounded half away from zero to two decimals. Zero when `from` is not
    /// positive or when `to >= from`.
    ///
    /// ```rust
    /// use orbit_core::money::{Money, Percent};
    ///
    /// let pct = Percent::reduction(Money::from_cents(3000), Money::from_cents(2000));
    /// assert_eq!(pct.bps(), 3333); // 33.33%
    ///
    /// let none = Percent::reduction(Money::zero(), Money::from_cents(100));
    /// assert!(none.is_zero());
    /// ```
    pub fn reduction(from: Money, to: Money) -> Percent {
        let base = from.cents() as i128;
        let diff = base - to.cents() as i128;
        if base <= 0 || diff <= 0 {
            return Percent::zero();
        }

        // diff / base * 10000, rounded: (2 * diff * 10000 + base) / (2 * base)
        let bps = (2 * diff * 10_000 + base) / (2 * base);
        Percent(bps as i64)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}%", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_cents(1250).format_with("₹"), "₹12.50");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_reduction_exact() {
        let pct = Percent::reduction(Money::from_cents(2500), Money::from_cents(2000));
        assert_eq!(pct.bps(), 2000);
        assert_eq!(pct.to_string(), "20.00%");
    }

    #[test]
    fn test_reduction_rounds_half_up() {
        // 1/8 = 12.5% exactly; 1/3 = 33.333..% → 33.33%; 2/3 = 66.666..% → 66.67%
        assert_eq!(
            Percent::reduction(Money::from_cents(800), Money::from_cents(700)).bps(),
            1250
        );
        assert_eq!(
            Percent::reduction(Money::from_cents(300), Money::from_cents(200)).bps(),
            3333
        );
        assert_eq!(
            Percent::reduction(Money::from_cents(300), Money::from_cents(100)).bps(),
            6667
        );
        // 1/160000 * 10000 = 0.0625 bps → 0; 1/16000 = 0.625 bps → 1
        assert_eq!(
            Percent::reduction(Money::from_cents(160_000), Money::from_cents(159_999)).bps(),
            0
        );
        assert_eq!(
            Percent::reduction(Money::from_cents(16_000), Money::from_cents(15_999)).bps(),
            1
        );
    }

    #[test]
    fn test_reduction_is_never_negative() {
        assert!(Percent::reduction(Money::from_cents(1000), Money::from_cents(1200)).is_zero());
        assert!(Percent::reduction(Money::from_cents(1000), Money::from_cents(1000)).is_zero());
        assert!(Percent::reduction(Money::zero(), Money::zero()).is_zero());
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from_bps(5).to_string(), "0.05%");
        assert_eq!(Percent::from_bps(10_000).to_string(), "100.00%");
        assert!((Percent::from_bps(1250).as_f64() - 12.5).abs() < f64::EPSILON);
    }
}
