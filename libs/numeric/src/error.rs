//! Errors raised by the decimal arithmetic core

use thiserror::Error;

/// Arithmetic and parsing failures for the fixed-scale decimal type
///
/// Every operation that can fail reports which value triggered the failure so
/// that callers can surface an actionable message without re-deriving context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// Input string is not a valid decimal literal
    #[error("invalid decimal literal {literal:?}: {reason}")]
    InvalidNumericLiteral { literal: String, reason: String },

    /// Division with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// Unsigned subtraction would produce a negative value
    #[error("decimal underflow: {minuend} - {subtrahend}")]
    Underflow { minuend: String, subtrahend: String },

    /// A signed intermediate ended up negative where an unsigned value is required
    #[error("cannot represent negative value {0} as an unsigned decimal")]
    NegativeValue(String),

    /// Asset precision exceeds the fixed decimal scale
    #[error("unsupported precision {0}: must not exceed 18 decimal places")]
    UnsupportedPrecision(u32),
}
