//! Constant-product (xyk) swap math
//!
//! Reproduces the on-chain contract's fixed-point evaluation of
//! `return = ask_pool - cp / (offer_pool + offer_amount)`: both ratios are
//! formed as 18-digit truncating decimals over the raw integer reserves, and
//! the result is floored back to integer units, so the off-chain answer
//! matches the chain exactly (no iterative rounding is involved).

use num_bigint::BigUint;
use num_traits::Zero;
use numeric::{uint_saturating_sub, Decimal};

use crate::error::SwapError;
use crate::SwapResult;

/// Constant-product swap math over raw integer reserves
pub struct XykMath;

impl XykMath {
    /// Simulate a swap against an xyk pool
    ///
    /// `reserves` are raw integer amounts; `ask_ind` selects the output side
    /// and the opposite reserve is the offer side. `fee_rate` must lie in
    /// `[0, 1)`.
    pub fn swap(
        offer_amount: &BigUint,
        ask_ind: usize,
        reserves: &[BigUint; 2],
        fee_rate: &Decimal,
    ) -> Result<SwapResult, SwapError> {
        if offer_amount.is_zero() {
            return Err(SwapError::InvalidInput(
                "offer amount must be positive".to_string(),
            ));
        }
        if ask_ind > 1 {
            return Err(SwapError::InvalidInput(format!(
                "ask index {ask_ind} out of range, pool has 2 assets"
            )));
        }
        if reserves.iter().any(|r| r.is_zero()) {
            return Err(SwapError::InvalidInput(
                "pool reserves must be positive".to_string(),
            ));
        }
        if fee_rate >= &Decimal::one() {
            return Err(SwapError::InvalidInput(format!(
                "fee rate {fee_rate} must be below 1"
            )));
        }

        let offer_ind = 1 - ask_ind;
        let offer_pool = &reserves[offer_ind];
        let ask_pool = &reserves[ask_ind];

        // return = ask_pool - cp / (offer_pool + offer_amount)
        let cp = offer_pool * ask_pool;
        let new_ask = Decimal::from_ratio(cp, offer_pool + offer_amount)?;
        let return_before_fee = Decimal::from_ratio(ask_pool.clone(), 1u8)?
            .checked_sub(&new_ask)?
            .to_uint();

        // Spread against the linear price implied by current reserves.
        let linear_rate = Decimal::from_ratio(ask_pool.clone(), offer_pool.clone())?;
        let ideal_return = linear_rate.mul_uint_floor(offer_amount);
        let spread_amount = uint_saturating_sub(&ideal_return, &return_before_fee);

        let commission_amount = fee_rate.mul_uint_floor(&return_before_fee);
        let return_amount = &return_before_fee - &commission_amount;

        Ok(SwapResult {
            return_amount,
            spread_amount,
            commission_amount,
        })
    }
}
