//! # Numeric - Fixed-Scale Decimal Core
//!
//! ## Purpose
//!
//! Arbitrary-precision decimal arithmetic with the exact truncating rounding
//! of on-chain 18-digit fixed-point integer math. Every AMM curve in this
//! workspace routes its arithmetic through these types so that off-chain
//! results can be audited against on-chain execution digit for digit.
//!
//! ## Integration Points
//!
//! - **Input Sources**: decimal string literals and raw on-chain integer
//!   amounts tagged with an asset precision
//! - **Output Destinations**: the `amm` curve solvers and swap facade
//! - **Precision**: fixed scale of 18 fractional digits, `BigUint` mantissa,
//!   truncation toward zero on multiply/divide (never banker's rounding)
//! - **Validation**: explicit errors for malformed literals, zero divisors,
//!   unsigned underflow and unsupported precisions
//!
//! ## Architecture Role
//!
//! Sits at the bottom of the dependency graph; has no knowledge of pools,
//! fees or curves. Nothing above it performs raw floating-point math.

pub mod decimal;
pub mod error;
pub mod signed;

pub use decimal::{
    uint_abs_diff, uint_saturating_sub, uint_within_one, Decimal, DECIMAL_FRACTIONAL,
    DECIMAL_PLACES,
};
pub use error::NumericError;
pub use signed::SignedDecimal;
