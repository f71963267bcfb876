//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    ₹12.50 is stored as 1250                                             │
//! │    All sums, discounts and GST are integer math                         │
//! │                                                                         │
//! │  The REST backend still speaks decimal rupees (`"mrp": 12.5`), so the   │
//! │  serde impls convert at the boundary and nowhere else.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::money::Money;
//!
//! let mrp = Money::from_minor_units(1250); // ₹12.50
//! let line = mrp * 3;
//! assert_eq!(line.minor_units(), 3750);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Percentage;

/// Minor units per major unit (100 paise to the rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: the reconciler accepts whatever prices the backend
///   sends, negative included; range checks belong to the form layer
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Wire format**: a JSON number in major units, see the serde impls
///
/// ## Where Money is Used
/// ```text
/// InventoryLot.mrp ──► CartLine price ──► line value ──► subtotal
///                                                           │
///                              discount ◄───────────────────┤
///                                                           ▼
///                                              total ──► SaleRecord.totalAmount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (paise).
    #[inline]
    pub const fn from_minor_units(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).minor_units(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor_units(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Converts a decimal major-unit amount, rounding to the nearest minor
    /// unit. Only used at the wire boundary.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(12.5).minor_units(), 1250);
    /// assert_eq!(Money::from_major_f64(0.1 + 0.2).minor_units(), 30);
    /// ```
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * MINOR_PER_MAJOR as f64).round() as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupee) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns the value as a decimal major-unit number, for the wire.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
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
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` of this amount, rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    /// use pharmacy_core::types::Percentage;
    ///
    /// let subtotal = Money::from_minor_units(25_000); // ₹250.00
    /// let ten_pct = Percentage::from_percent(10.0);
    /// assert_eq!(subtotal.percentage_of(ten_pct).minor_units(), 2_500);
    ///
    /// // ₹0.05 at 10% = 0.5 paise → 1 paisa
    /// assert_eq!(Money::from_minor_units(5).percentage_of(ten_pct).minor_units(), 1);
    /// ```
    pub fn percentage_of(&self, rate: Percentage) -> Money {
        // i128 so that large carts cannot overflow the intermediate product
        let scaled = self.0 as i128 * rate.bps() as i128;
        let denom = Percentage::FULL_BPS as i128;
        let half = denom / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / denom
        } else {
            (scaled - half) / denom
        };
        Money(rounded as i64)
    }

    /// Clamps the value into `[min, max]`. If `max < min`, `min` wins.
    pub fn clamp_to(self, min: Money, max: Money) -> Money {
        if self > max {
            if max < min {
                return min;
            }
            return max;
        }
        if self < min {
            return min;
        }
        self
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates. Cart quantities only ever grow by saturating adds, so
// a line value can legitimately sit at the i64 ceiling.

/// Plain decimal rendering (`12.50`, `-5.50`). Currency symbols are a
/// display concern handled by the configuration layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serializes as a major-unit JSON number: whole amounts as integers
/// (`10`), everything else as a float (`12.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.0 / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.to_major_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount in major currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom("amount out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        Ok(Money::from_major_f64(v))
    }

    // Form-encoded bodies occasionally send prices as strings.
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Money::zero());
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            .and_then(|f| self.visit_f64(f))
    }
}
