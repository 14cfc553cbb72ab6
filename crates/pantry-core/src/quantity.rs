//! # Quantity Module
//!
//! Provides the `Quantity` type for stock amounts.
//!
//! ## Why Integer Quantities?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Grocery stock is decimal: 1.250 kg of apples, 0.500 l of milk.        │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    The snapshot/movement-sum invariant would drift over time.          │
//! │                                                                         │
//! │  OUR SOLUTION: integer milli-units (thousandths of a unit)             │
//! │    1.250 kg  = 1250 milli                                              │
//! │    10 pieces = 10000 milli                                             │
//! │    Sums are exact, comparisons are exact, SQLite stores an INTEGER.    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pantry_core::quantity::Quantity;
//!
//! // Whole units (pieces)
//! let qty = Quantity::from_units(10);
//! assert_eq!(qty.milli(), 10_000);
//!
//! // Fractional units (1.250 kg)
//! let weight = Quantity::from_milli(1250);
//! assert_eq!(weight.to_string(), "1.250");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Quantity Type
// =============================================================================

/// A signed stock quantity in milli-units (thousandths of a unit of measure).
///
/// ## Design Decisions
/// - **i64 (signed)**: movements are signed deltas; on-hand may go negative
///   as a configured business rule, so the type never forbids it
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Milli-units**: three decimal places cover weighed goods (grams on a
///   kg-denominated product) without floats
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milli-units (the smallest stock unit).
    ///
    /// ## Example
    /// ```rust
    /// use pantry_core::quantity::Quantity;
    ///
    /// let q = Quantity::from_milli(1250); // 1.250 units
    /// assert_eq!(q.milli(), 1250);
    /// ```
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use pantry_core::quantity::Quantity;
    ///
    /// let q = Quantity::from_units(50);
    /// assert_eq!(q.milli(), 50_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Returns the value in milli-units.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 1000
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks whether the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks whether the quantity is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks whether the quantity is strictly negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the magnitude of the quantity.
    ///
    /// Used by sign normalization: the caller-entered sign is discarded for
    /// movement types with a fixed sign convention.
    #[inline]
    pub const fn abs(&self) -> Self {
        Quantity(self.0.abs())
    }

    /// Returns the arithmetic inverse.
    #[inline]
    pub const fn negated(&self) -> Self {
        Quantity(-self.0)
    }
}

// =============================================================================
// Arithmetic Operators
// =============================================================================

impl Add for Quantity {
    type Output = Quantity;

    #[inline]
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    #[inline]
    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, rhs: Quantity) {
        self.0 -= rhs.0;
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    #[inline]
    fn neg(self) -> Quantity {
        Quantity(-self.0)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats as a decimal with three places: `1250` milli → `"1.250"`.
///
/// Display only; the engine, API and database always use milli-units.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:03}", sign, abs / 1000, abs % 1000)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
