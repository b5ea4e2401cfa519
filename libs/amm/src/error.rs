//! Swap engine error taxonomy
//!
//! Every failure a caller can observe maps to exactly one of these kinds.
//! Errors are detected before any iterative computation starts wherever
//! possible, and are never retried internally; a call either fully succeeds
//! or fails with one of these values.

use numeric::NumericError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Malformed or out-of-range argument (non-positive amount, bad index,
    /// fee outside `[0, 1)`, precision above the decimal scale)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Argument string is not a parsable decimal literal
    #[error("invalid numeric literal: {0}")]
    InvalidNumericLiteral(String),

    /// Division with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// Ramp window is malformed (reversed bounds, or a zero-length window
    /// with differing endpoint values)
    #[error("invalid ramp config: {0}")]
    InvalidRampConfig(String),

    /// Structurally invalid pool parameters (non-positive price scale or
    /// gamma, or an intermediate that the curve math cannot represent)
    #[error("invalid pool state: {0}")]
    InvalidPoolState(String),

    /// Newton iteration exceeded its iteration cap without converging
    #[error("{context} did not converge within {max_iter} iterations")]
    ConvergenceFailure {
        context: &'static str,
        max_iter: usize,
    },
}

impl From<NumericError> for SwapError {
    fn from(err: NumericError) -> Self {
        match err {
            NumericError::InvalidNumericLiteral { .. } => {
                SwapError::InvalidNumericLiteral(err.to_string())
            }
            NumericError::DivisionByZero => SwapError::DivisionByZero,
            NumericError::UnsupportedPrecision(_) => SwapError::InvalidInput(err.to_string()),
            NumericError::Underflow { .. } | NumericError::NegativeValue(_) => {
                SwapError::InvalidPoolState(err.to_string())
            }
        }
    }
}
