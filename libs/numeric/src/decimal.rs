//! Fixed-scale decimal arithmetic over arbitrary-precision integers
//!
//! Mirrors the rounding behaviour of on-chain 18-digit fixed-point math:
//! every multiplication and division truncates toward zero at the 18th
//! fractional digit, exactly like integer division over the raw atomics.
//! Backed by `BigUint` so no value range ever forces a silent precision loss.

use std::fmt;
use std::ops;
use std::str::FromStr;

use num_bigint::BigUint;
use num_integer::Roots;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NumericError;

/// Number of fractional digits carried by [`Decimal`]
pub const DECIMAL_PLACES: u32 = 18;

/// 10^18, the atomics-per-unit factor
pub static DECIMAL_FRACTIONAL: Lazy<BigUint> =
    Lazy::new(|| BigUint::from(10u32).pow(DECIMAL_PLACES));

/// Unsigned fixed-scale decimal with 18 fractional digits
///
/// The inner value holds the number scaled by `10^18` ("atomics"). All
/// arithmetic is exact except multiplication and division, which truncate
/// toward zero at the atomic scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal(BigUint);

impl Decimal {
    pub fn zero() -> Self {
        Decimal(BigUint::zero())
    }

    pub fn one() -> Self {
        Decimal(DECIMAL_FRACTIONAL.clone())
    }

    /// Build directly from atomics (value scaled by 10^18)
    pub fn raw(atomics: impl Into<BigUint>) -> Self {
        Decimal(atomics.into())
    }

    pub fn atomics(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn from_integer(value: impl Into<BigUint>) -> Self {
        Decimal(value.into() * &*DECIMAL_FRACTIONAL)
    }

    /// Interpret a raw on-chain integer amount with the given number of
    /// decimal places, e.g. `with_precision(1500000, 6)` is `1.5`.
    pub fn with_precision(
        raw: impl Into<BigUint>,
        precision: u32,
    ) -> Result<Self, NumericError> {
        if precision > DECIMAL_PLACES {
            return Err(NumericError::UnsupportedPrecision(precision));
        }
        let shift = BigUint::from(10u32).pow(DECIMAL_PLACES - precision);
        Ok(Decimal(raw.into() * shift))
    }

    /// Truncating ratio of two integers
    pub fn from_ratio(
        numerator: impl Into<BigUint>,
        denominator: impl Into<BigUint>,
    ) -> Result<Self, NumericError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Decimal(
            numerator.into() * &*DECIMAL_FRACTIONAL / denominator,
        ))
    }

    pub fn checked_sub(&self, rhs: &Decimal) -> Result<Decimal, NumericError> {
        if self.0 < rhs.0 {
            return Err(NumericError::Underflow {
                minuend: self.to_string(),
                subtrahend: rhs.to_string(),
            });
        }
        Ok(Decimal(&self.0 - &rhs.0))
    }

    pub fn saturating_sub(&self, rhs: &Decimal) -> Decimal {
        if self.0 < rhs.0 {
            Decimal::zero()
        } else {
            Decimal(&self.0 - &rhs.0)
        }
    }

    /// Truncating division
    pub fn checked_div(&self, rhs: &Decimal) -> Result<Decimal, NumericError> {
        if rhs.0.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Decimal(&self.0 * &*DECIMAL_FRACTIONAL / &rhs.0))
    }

    /// `self * numerator / denominator` with a single truncation over atomics
    pub fn checked_multiply_ratio(
        &self,
        numerator: &Decimal,
        denominator: &Decimal,
    ) -> Result<Decimal, NumericError> {
        if denominator.0.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Decimal(&self.0 * &numerator.0 / &denominator.0))
    }

    /// Multiply a raw integer amount by this decimal, truncating toward zero
    pub fn mul_uint_floor(&self, rhs: &BigUint) -> BigUint {
        &self.0 * rhs / &*DECIMAL_FRACTIONAL
    }

    /// Integer power via square-and-multiply over the truncating mul
    pub fn pow(&self, mut exp: u32) -> Decimal {
        let mut result = Decimal::one();
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base.clone();
            }
            base = base.clone() * base;
            exp >>= 1;
        }
        result
    }

    /// Square root, truncated at the atomic scale
    pub fn sqrt(&self) -> Decimal {
        Decimal((&self.0 * &*DECIMAL_FRACTIONAL).sqrt())
    }

    /// Absolute difference
    pub fn diff(&self, other: &Decimal) -> Decimal {
        if self.0 >= other.0 {
            Decimal(&self.0 - &other.0)
        } else {
            Decimal(&other.0 - &self.0)
        }
    }

    /// Whole units, truncated toward zero
    pub fn to_uint(&self) -> BigUint {
        &self.0 / &*DECIMAL_FRACTIONAL
    }

    /// Largest whole-unit decimal not exceeding `self`
    pub fn floor(&self) -> Decimal {
        Decimal(&self.0 / &*DECIMAL_FRACTIONAL * &*DECIMAL_FRACTIONAL)
    }

    /// Raw integer amount at the given precision, truncated toward zero
    pub fn to_atomics(&self, precision: u32) -> Result<BigUint, NumericError> {
        if precision > DECIMAL_PLACES {
            return Err(NumericError::UnsupportedPrecision(precision));
        }
        let shift = BigUint::from(10u32).pow(DECIMAL_PLACES - precision);
        Ok(&self.0 / shift)
    }
}

impl ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl ops::Add<&Decimal> for Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(self.0 + &rhs.0)
    }
}

impl ops::Mul for Decimal {
    type Output = Decimal;

    /// Truncating multiplication
    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0 / &*DECIMAL_FRACTIONAL)
    }
}

impl ops::Mul<&Decimal> for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(self.0 * &rhs.0 / &*DECIMAL_FRACTIONAL)
    }
}

impl FromStr for Decimal {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| NumericError::InvalidNumericLiteral {
            literal: s.to_string(),
            reason: reason.to_string(),
        };

        let (whole_str, frac_str) = match s.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (s, None),
        };

        if whole_str.is_empty() || !whole_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected unsigned decimal digits"));
        }
        let whole: BigUint = whole_str
            .parse()
            .map_err(|_| invalid("expected unsigned decimal digits"))?;
        let mut atomics = whole * &*DECIMAL_FRACTIONAL;

        if let Some(frac_str) = frac_str {
            if frac_str.is_empty() || !frac_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("expected digits after decimal point"));
            }
            if frac_str.len() as u32 > DECIMAL_PLACES {
                return Err(invalid("more than 18 fractional digits"));
            }
            let frac: BigUint = frac_str
                .parse()
                .map_err(|_| invalid("expected digits after decimal point"))?;
            let shift = BigUint::from(10u32).pow(DECIMAL_PLACES - frac_str.len() as u32);
            atomics += frac * shift;
        }

        Ok(Decimal(atomics))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = &self.0 / &*DECIMAL_FRACTIONAL;
        let frac = &self.0 % &*DECIMAL_FRACTIONAL;
        if frac.is_zero() {
            return write!(f, "{whole}");
        }
        let frac_str = format!("{frac:0>width$}", width = DECIMAL_PLACES as usize);
        write!(f, "{whole}.{}", frac_str.trim_end_matches('0'))
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal::from_integer(value)
    }
}

// On the wire decimals travel as strings, never as binary floats.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Saturating subtraction over raw integer amounts
pub fn uint_saturating_sub(lhs: &BigUint, rhs: &BigUint) -> BigUint {
    if lhs < rhs {
        BigUint::zero()
    } else {
        lhs - rhs
    }
}

/// Absolute difference over raw integer amounts
pub fn uint_abs_diff(lhs: &BigUint, rhs: &BigUint) -> BigUint {
    if lhs >= rhs {
        lhs - rhs
    } else {
        rhs - lhs
    }
}

/// `true` iff the absolute difference is at most one
pub fn uint_within_one(lhs: &BigUint, rhs: &BigUint) -> bool {
    uint_abs_diff(lhs, rhs) <= BigUint::one()
}
