//! Stableswap invariant math with a ramped amplification coefficient
//!
//! Two Newton iterations per swap: one solving the invariant `D` for the
//! current reserves in decimal space, one solving the new ask-side reserve
//! `y` in integer space at the normalized precision. Decimal space carries
//! 18 fractional digits throughout, so truncation only happens where the
//! on-chain contract truncates: at the normalized-unit boundary and at the
//! final output step.

use num_bigint::BigUint;
use num_traits::Zero;
use numeric::{uint_saturating_sub, uint_within_one, Decimal};
use tracing::trace;

use crate::error::SwapError;
use crate::ramp::RampedParameter;
use crate::SwapResult;

/// Number of assets in a pool
const N_COINS: u32 = 2;
/// The on-chain amp value carries this fixed multiplier
const AMP_PRECISION: u32 = 100;
/// Iteration cap for both Newton loops
const ITERATIONS: usize = 64;

/// Stableswap math over raw integer reserves tagged with asset precisions
pub struct StableMath;

impl StableMath {
    /// Simulate a swap against a stableswap pool
    ///
    /// Reserves and offer are raw integer amounts; each side is interpreted
    /// at its own precision and normalized to the greater of the two before
    /// invariant math. `amp_ramp` values are raw on-chain amp units
    /// (`A * 100`).
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        offer_amount: &BigUint,
        offer_prec: u32,
        ask_ind: usize,
        ask_prec: u32,
        reserves: &[BigUint; 2],
        fee_rate: &Decimal,
        block_time: u64,
        amp_ramp: &RampedParameter,
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

        let max_prec = offer_prec.max(ask_prec);
        let pools = [
            Decimal::with_precision(
                reserves[0].clone(),
                if ask_ind == 0 { ask_prec } else { offer_prec },
            )?,
            Decimal::with_precision(
                reserves[1].clone(),
                if ask_ind == 1 { ask_prec } else { offer_prec },
            )?,
        ];
        let offer_dec = Decimal::with_precision(offer_amount.clone(), offer_prec)?;

        // On-chain amp is an integer; the resolver's decimal result is
        // floored back to raw amp units.
        let amp = amp_ramp.resolve(block_time)?.to_uint();
        if amp.is_zero() {
            return Err(SwapError::InvalidInput(
                "amplification must be positive".to_string(),
            ));
        }

        let offer_ind = 1 - ask_ind;
        let new_offer_pool = pools[offer_ind].clone() + &offer_dec;
        let y = Self::calc_y(&amp, &new_offer_pool, &pools, max_prec)?;

        let old_ask = pools[ask_ind].to_atomics(max_prec)?;
        if old_ask < y {
            return Err(SwapError::InvalidPoolState(
                "ask reserve below invariant solution".to_string(),
            ));
        }
        let scale_down = BigUint::from(10u32).pow(max_prec - ask_prec);
        let return_before_fee = (old_ask - y) / scale_down;

        // Stableswap quotes 1:1, so any shortfall against the offer is spread.
        let offer_at_ask_prec = offer_dec.to_atomics(ask_prec)?;
        let spread_amount = uint_saturating_sub(&offer_at_ask_prec, &return_before_fee);

        let commission_amount = fee_rate.mul_uint_floor(&return_before_fee);
        let return_amount = &return_before_fee - &commission_amount;

        Ok(SwapResult {
            return_amount,
            spread_amount,
            commission_amount,
        })
    }

    /// Invariant `D` for the given reserves via Newton's method
    ///
    /// Converged when successive guesses differ by at most one smallest
    /// normalized unit (`10^-max_prec`).
    pub(crate) fn compute_d(
        amp: &BigUint,
        pools: &[Decimal; 2],
        max_prec: u32,
    ) -> Result<Decimal, SwapError> {
        let n_coins = Decimal::from_integer(N_COINS);
        let sum_x = pools[0].clone() + &pools[1];
        let leverage = Decimal::from_ratio(amp.clone(), AMP_PRECISION)? * &n_coins;
        let tolerance = Decimal::with_precision(1u8, max_prec)?;

        let mut d = sum_x.clone();
        for iter in 0..ITERATIONS {
            // d_product = d^(n+1) / (n^n * x0 * x1), folded one pool at a time
            let mut d_product = d.clone();
            for pool in &pools[..] {
                d_product =
                    d_product.checked_multiply_ratio(&d, &(pool.clone() * &n_coins))?;
            }
            let d_previous = d;
            d = Self::calculate_step(&d_previous, &leverage, &sum_x, &d_product)?;
            if d.diff(&d_previous) <= tolerance {
                trace!(iterations = iter + 1, d = %d, "stableswap invariant converged");
                return Ok(d);
            }
        }

        Err(SwapError::ConvergenceFailure {
            context: "stableswap invariant",
            max_iter: ITERATIONS,
        })
    }

    /// One Newton step:
    /// `d' = ((leverage * sum_x + 2 * d_product) * d) / ((leverage - 1) * d + 3 * d_product)`
    fn calculate_step(
        initial_d: &Decimal,
        leverage: &Decimal,
        sum_x: &Decimal,
        d_product: &Decimal,
    ) -> Result<Decimal, SwapError> {
        let n_coins = Decimal::from_integer(N_COINS);
        let leverage_mul = leverage.clone() * sum_x;
        let d_p_mul = d_product.clone() * &n_coins;
        let l_val = (leverage_mul + d_p_mul) * initial_d;

        let leverage_sub =
            initial_d.clone() * &leverage.checked_sub(&Decimal::one())?;
        let n_coins_sum = d_product.clone() * &(n_coins + &Decimal::one());
        let r_val = leverage_sub + n_coins_sum;

        Ok(l_val.checked_div(&r_val)?)
    }

    /// New ask-side reserve keeping `D` invariant after the offer lands
    ///
    /// Runs in integer space at the normalized precision, solving
    /// `y^2 + b*y = c` by Newton iteration; converged when successive
    /// guesses differ by at most one.
    pub(crate) fn calc_y(
        amp: &BigUint,
        new_offer_pool: &Decimal,
        pools: &[Decimal; 2],
        max_prec: u32,
    ) -> Result<BigUint, SwapError> {
        let amp_prec = BigUint::from(AMP_PRECISION);
        let ann = amp * N_COINS;
        let d = Self::compute_d(amp, pools, max_prec)?.to_atomics(max_prec)?;
        let new_offer_pool = new_offer_pool.to_atomics(max_prec)?;
        if new_offer_pool.is_zero() {
            return Err(SwapError::DivisionByZero);
        }

        let c = &d * &d / (&new_offer_pool * N_COINS);
        let c = c * &d * &amp_prec / (&ann * N_COINS);
        let b = &new_offer_pool + &d * &amp_prec / &ann;

        let mut y = d.clone();
        for iter in 0..ITERATIONS {
            let denom = BigUint::from(2u8) * &y + &b;
            if denom <= d {
                return Err(SwapError::InvalidPoolState(
                    "stableswap y denominator underflow".to_string(),
                ));
            }
            let y_next = (&y * &y + &c) / (denom - &d);
            if uint_within_one(&y_next, &y) {
                trace!(iterations = iter + 1, y = %y_next, "stableswap y converged");
                return Ok(y_next);
            }
            y = y_next;
        }

        Err(SwapError::ConvergenceFailure {
            context: "stableswap y",
            max_iter: ITERATIONS,
        })
    }
}
