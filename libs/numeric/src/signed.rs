//! Sign-magnitude wrapper over [`Decimal`]
//!
//! The concentrated-liquidity Newton iteration evaluates derivatives that
//! swing negative, so it runs on this total signed type and converts back to
//! the unsigned decimal once the root is found.

use std::fmt;
use std::ops;

use crate::decimal::Decimal;
use crate::error::NumericError;

/// Signed fixed-scale decimal; `neg` marks the sign of a non-zero magnitude
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDecimal {
    magnitude: Decimal,
    neg: bool,
}

impl SignedDecimal {
    pub fn zero() -> Self {
        Decimal::zero().into()
    }

    pub fn magnitude(&self) -> &Decimal {
        &self.magnitude
    }

    pub fn is_negative(&self) -> bool {
        self.neg && !self.magnitude.is_zero()
    }

    /// Integer power; even exponents always yield a non-negative result
    pub fn pow(&self, exp: u32) -> Self {
        if self.magnitude.is_zero() {
            return Self::zero();
        }
        Self {
            magnitude: self.magnitude.pow(exp),
            neg: if exp % 2 == 0 { false } else { self.neg },
        }
    }

    /// Absolute difference, always non-negative
    pub fn diff(&self, other: &SignedDecimal) -> Decimal {
        if self.neg == other.neg {
            self.magnitude.diff(&other.magnitude)
        } else {
            self.magnitude.clone() + &other.magnitude
        }
    }

    /// Truncating division; fails on a zero divisor
    pub fn checked_div(&self, rhs: &SignedDecimal) -> Result<SignedDecimal, NumericError> {
        Ok(SignedDecimal {
            magnitude: self.magnitude.checked_div(&rhs.magnitude)?,
            neg: self.neg ^ rhs.neg,
        })
    }
}

impl From<Decimal> for SignedDecimal {
    fn from(magnitude: Decimal) -> Self {
        SignedDecimal {
            magnitude,
            neg: false,
        }
    }
}

impl From<&Decimal> for SignedDecimal {
    fn from(magnitude: &Decimal) -> Self {
        magnitude.clone().into()
    }
}

impl TryFrom<SignedDecimal> for Decimal {
    type Error = NumericError;

    fn try_from(value: SignedDecimal) -> Result<Self, Self::Error> {
        if value.is_negative() {
            Err(NumericError::NegativeValue(value.to_string()))
        } else {
            Ok(value.magnitude)
        }
    }
}

impl ops::Add for SignedDecimal {
    type Output = SignedDecimal;

    fn add(self, rhs: SignedDecimal) -> SignedDecimal {
        if self.neg == rhs.neg {
            SignedDecimal {
                magnitude: self.magnitude + rhs.magnitude,
                ..self
            }
        } else if self.magnitude > rhs.magnitude {
            SignedDecimal {
                magnitude: self.magnitude.saturating_sub(&rhs.magnitude),
                ..self
            }
        } else {
            SignedDecimal {
                magnitude: rhs.magnitude.saturating_sub(&self.magnitude),
                ..rhs
            }
        }
    }
}

impl ops::Add<Decimal> for SignedDecimal {
    type Output = SignedDecimal;

    fn add(self, rhs: Decimal) -> SignedDecimal {
        self + SignedDecimal::from(rhs)
    }
}

impl ops::Add<SignedDecimal> for Decimal {
    type Output = SignedDecimal;

    fn add(self, rhs: SignedDecimal) -> SignedDecimal {
        rhs + self
    }
}

impl ops::Sub for SignedDecimal {
    type Output = SignedDecimal;

    fn sub(self, rhs: SignedDecimal) -> SignedDecimal {
        self + SignedDecimal {
            neg: !rhs.neg,
            ..rhs
        }
    }
}

impl ops::Sub<Decimal> for SignedDecimal {
    type Output = SignedDecimal;

    fn sub(self, rhs: Decimal) -> SignedDecimal {
        self + SignedDecimal {
            magnitude: rhs,
            neg: true,
        }
    }
}

impl ops::Sub<SignedDecimal> for Decimal {
    type Output = SignedDecimal;

    fn sub(self, rhs: SignedDecimal) -> SignedDecimal {
        SignedDecimal::from(self) - rhs
    }
}

impl ops::Mul for SignedDecimal {
    type Output = SignedDecimal;

    fn mul(self, rhs: SignedDecimal) -> SignedDecimal {
        SignedDecimal {
            magnitude: self.magnitude * rhs.magnitude,
            neg: self.neg ^ rhs.neg,
        }
    }
}

impl ops::Mul<Decimal> for SignedDecimal {
    type Output = SignedDecimal;

    fn mul(self, rhs: Decimal) -> SignedDecimal {
        SignedDecimal {
            magnitude: self.magnitude * rhs,
            ..self
        }
    }
}

impl ops::Mul<SignedDecimal> for Decimal {
    type Output = SignedDecimal;

    fn mul(self, rhs: SignedDecimal) -> SignedDecimal {
        rhs * self
    }
}

impl ops::Neg for SignedDecimal {
    type Output = SignedDecimal;

    fn neg(self) -> SignedDecimal {
        SignedDecimal {
            neg: !self.neg,
            ..self
        }
    }
}

impl fmt::Display for SignedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sd(s: &str) -> SignedDecimal {
        let (neg, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let magnitude: Decimal = digits.parse().unwrap();
        if neg {
            -SignedDecimal::from(magnitude)
        } else {
            magnitude.into()
        }
    }

    #[test]
    fn add_and_sub_cross_zero() {
        assert_eq!(sd("2") + sd("-5"), sd("-3"));
        assert_eq!(sd("-2") + sd("5"), sd("3"));
        assert_eq!(sd("2") - sd("5"), sd("-3"));
        assert_eq!(sd("-2") - sd("-5"), sd("3"));
    }

    #[test]
    fn mul_and_div_combine_signs() {
        assert_eq!(sd("-2") * sd("3"), sd("-6"));
        assert_eq!(sd("-2") * sd("-3"), sd("6"));
        assert_eq!(sd("-6").checked_div(&sd("3")).unwrap(), sd("-2"));
        assert_eq!(sd("6").checked_div(&sd("-3")).unwrap(), sd("-2"));
        assert_eq!(
            sd("1").checked_div(&SignedDecimal::zero()),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn pow_parity_controls_sign() {
        assert_eq!(sd("-2").pow(2), sd("4"));
        assert_eq!(sd("-2").pow(3), sd("-8"));
        assert_eq!(SignedDecimal::zero().pow(5), SignedDecimal::zero());
    }

    #[test]
    fn diff_is_total_distance() {
        assert_eq!(sd("3").diff(&sd("-2")), "5".parse().unwrap());
        assert_eq!(sd("-3").diff(&sd("-2")), "1".parse().unwrap());
        assert_eq!(sd("3").diff(&sd("5")), "2".parse().unwrap());
    }

    #[test]
    fn negative_values_do_not_convert_to_unsigned() {
        assert!(Decimal::try_from(sd("-1")).is_err());
        let zero: Decimal = (-SignedDecimal::zero()).try_into().unwrap();
        assert!(zero.is_zero());
    }
}
