//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers in reais:                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart with 3 × R$ 0,10 summed as floats drifts the same way.         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    Decode once at the wire boundary:  10.5 → 1050 centavos            │
//! │    All cart math is integer math                                       │
//! │    Encode once at the wire boundary:  3150 → 31.5                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use roda_core::money::Money;
//!
//! let price = Money::from_cents(1099); // R$ 10,99
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.cents(), 2198);
//!
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.to_string(), "R$ 15,99");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest BRL unit).
///
/// ## Wire Format
/// On the wire Money is a JSON number in reais (`10.5`). Decoding also
/// accepts numeric strings (`"10.50"`) since decimal columns are often
/// serialized that way. Fractions of a centavo are rounded half away
/// from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use roda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount in reais.
    ///
    /// Only used at the wire boundary; never do arithmetic in reais.
    ///
    /// ## Example
    /// ```rust
    /// use roda_core::money::Money;
    ///
    /// assert_eq!(Money::from_reais(10.5).cents(), 1050);
    /// assert_eq!(Money::from_reais(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_reais(reais: f64) -> Self {
        Money((reais * 100.0).round() as i64)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount in reais (wire format).
    #[inline]
    pub fn as_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Saturates instead of wrapping on absurd quantities.
    ///
    /// ## Example
    /// ```rust
    /// use roda_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Display (pt-BR currency format)
// =============================================================================

impl fmt::Display for Money {
    /// Formats as `R$ 1.234,56` (pt-BR grouping and decimal comma).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let frac = abs % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, frac)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================
//
// All operators saturate, like `multiply_quantity`.

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, qty: u32) -> Money {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses `"24.90"`, `"24,90"` or `"24"` as reais.
fn parse_reais(text: &str) -> Option<Money> {
    let reais: f64 = text.trim().replace(',', ".").parse().ok()?;
    reais.is_finite().then(|| Money::from_reais(reais))
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_reais(s).ok_or_else(|| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("'{}' is not an amount in reais", s),
        })
    }
}

// =============================================================================
// Serde (reais on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_reais())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ReaisVisitor)
    }
}

struct ReaisVisitor;

impl<'de> Visitor<'de> for ReaisVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in reais as a number or numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        Ok(Money::from_reais(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from_cents(v.saturating_mul(100)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let reais = i64::try_from(v).map_err(|_| E::custom("amount out of range"))?;
        self.visit_i64(reais)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        parse_reais(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + max, max);
        assert_eq!([max, max].iter().sum::<Money>(), max);

        let mut acc = max;
        acc += Money::from_cents(1);
        assert_eq!(acc, max);

        let min = Money::from_cents(i64::MIN);
        assert_eq!(min - Money::from_cents(1), min);
        let mut acc = min;
        acc -= max;
        assert_eq!(acc, min);
    }

    #[test]
    fn test_from_str_accepts_comma_or_dot() {
        assert_eq!("24,90".parse::<Money>().unwrap().cents(), 2490);
        assert_eq!(" 24.9 ".parse::<Money>().unwrap().cents(), 2490);
        assert_eq!("7".parse::<Money>().unwrap().cents(), 700);
        assert!("sete".parse::<Money>().is_err());
        assert!("inf".parse::<Money>().is_err());
    }

    #[test]
    fn test_display_pt_br() {
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(1050).to_string(), "R$ 10,50");
        assert_eq!(Money::from_cents(123456789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_cents(-2500).to_string(), "-R$ 25,00");
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 1000);
    }

    #[test]
    fn test_float_drift_is_absorbed_at_the_boundary() {
        let ten_cents = Money::from_reais(0.1);
        assert_eq!((ten_cents * 3).cents(), 30);
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_float: Money = serde_json::from_str("10.5").unwrap();
        let from_int: Money = serde_json::from_str("12").unwrap();
        let from_str: Money = serde_json::from_str("\"7.25\"").unwrap();

        assert_eq!(from_float.cents(), 1050);
        assert_eq!(from_int.cents(), 1200);
        assert_eq!(from_str.cents(), 725);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Money>("\"ten\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_serialize_as_reais() {
        let json = serde_json::to_string(&Money::from_cents(3150)).unwrap();
        assert_eq!(json, "31.5");
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(4).cents(), i64::MAX);
    }
}
