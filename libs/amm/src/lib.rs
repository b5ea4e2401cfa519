//! # AMM - Deterministic Swap Pricing Engine
//!
//! ## Purpose
//!
//! Off-chain reproduction of the swap math run by on-chain AMM pool
//! contracts, bit-for-bit where the contract's integer rounding allows it.
//! Covers three curve families: constant product (xyk), stableswap with a
//! time-ramped amplification coefficient, and concentrated liquidity (PCL)
//! with a ramped amp/gamma pair, a price-scale transform and a dynamic fee.
//!
//! ## Integration Points
//!
//! - **Input Sources**: pool reserves and curve parameters fetched by the
//!   caller (arbitrage bots, UIs, test harnesses) from a ledger query
//! - **Output Destinations**: structured swap results consumed before
//!   transaction submission, without a network round-trip
//! - **Precision**: all arithmetic through the `numeric` fixed-scale decimal
//!   core; no floating point anywhere
//! - **Validation**: every entry point validates before iterating; errors
//!   carry a discriminated kind plus a human-readable message
//!
//! ## Architecture Role
//!
//! Pure functions only. No call reads or writes shared state, performs I/O,
//! or depends on a clock; concurrent callers need no locking. The Newton
//! solvers are iteration-capped so worst-case latency is a small constant
//! number of decimal multiplications.

pub mod api;
pub mod concentrated;
pub mod error;
pub mod ramp;
pub mod stable;
pub mod xyk;

pub use concentrated::{PclMath, PclParams, PclSwapDetail};
pub use error::SwapError;
pub use ramp::RampedParameter;
pub use stable::StableMath;
pub use xyk::XykMath;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Outcome of a swap simulation
///
/// All three amounts are raw integer units of the ask asset (at its on-chain
/// precision) and serialize as decimal strings, matching the JSON convention
/// for 128-bit integers on the chain side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Ask-asset amount returned by the swap, after fees
    #[serde(with = "uint_string")]
    pub return_amount: BigUint,
    /// Difference between the linear-price-implied output and the pre-fee
    /// curve output; a measure of price impact
    #[serde(with = "uint_string")]
    pub spread_amount: BigUint,
    /// Fee deducted from the pre-fee output
    #[serde(with = "uint_string")]
    pub commission_amount: BigUint,
}

mod uint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_result_serializes_amounts_as_strings() {
        let result = SwapResult {
            return_amount: 1249554107u64.into(),
            spread_amount: 3127132u64.into(),
            commission_amount: 3760663u64.into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"return_amount":"1249554107","spread_amount":"3127132","commission_amount":"3760663"}"#
        );
        let back: SwapResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
