//! Concentrated-liquidity (PCL) swap math
//!
//! The curve blends constant-product and stableswap behaviour around a
//! configurable price scale. Internally asset 1 is rescaled by `price_scale`
//! so the invariant `D` is computed over comparable units; two
//! Newton iterations over [`SignedDecimal`] solve for `D` and for the new
//! ask-side balance, and the fee charged interpolates between `mid_fee` and
//! `out_fee` based on how far the pool sits from balance.

use num_bigint::BigUint;
use num_traits::Zero;
use numeric::{Decimal, SignedDecimal};
use once_cell::sync::Lazy;
use tracing::trace;

use crate::error::SwapError;
use crate::ramp::RampedParameter;
use crate::SwapResult;

/// Number of assets in a pool, as a decimal
static N: Lazy<Decimal> = Lazy::new(|| Decimal::from_integer(2u8));
/// N^2
static N_POW2: Lazy<Decimal> = Lazy::new(|| Decimal::from_integer(4u8));
/// Newton convergence tolerance, 1e-5
static TOL: Lazy<Decimal> = Lazy::new(|| Decimal::raw(10_000_000_000_000u64));
/// Fee coefficients at or below this collapse to zero, 0.001
static FEE_TOL: Lazy<Decimal> = Lazy::new(|| Decimal::raw(1_000_000_000_000_000u64));
/// Accuracy padding for derivative terms whose numerator and denominator
/// would otherwise truncate to zero independently (value 1e18)
static PADDING: Lazy<Decimal> = Lazy::new(|| Decimal::raw(BigUint::from(10u32).pow(36)));
/// Iteration cap for both Newton loops
const MAX_ITER: usize = 64;

/// Static curve parameters of a concentrated pool
///
/// Amp and gamma ramp over time and are passed separately as
/// [`RampedParameter`]s.
#[derive(Debug, Clone)]
pub struct PclParams {
    /// Price of asset 1 expressed in asset 0, used to transform balances
    /// into comparable internal units
    pub price_scale: Decimal,
    /// Governs how fast the fee moves from `mid_fee` to `out_fee` as the
    /// pool leaves balance
    pub fee_gamma: Decimal,
    /// Fee charged when the pool is perfectly balanced
    pub mid_fee: Decimal,
    /// Fee charged when the pool is fully imbalanced
    pub out_fee: Decimal,
    /// Share of the total fee routed to the protocol
    pub maker_fee_share: Decimal,
    /// Hard cap on the effective fee rate
    pub total_fee_rate: Decimal,
}

/// Swap outcome plus the fee breakdown callers may want beyond the wire
/// result
#[derive(Debug, Clone)]
pub struct PclSwapDetail {
    pub result: SwapResult,
    /// Protocol share of the commission, in ask-asset units
    pub maker_fee_amount: BigUint,
    /// Effective fee rate applied, after the dynamic-fee blend and cap
    pub fee_rate: Decimal,
}

/// Concentrated-liquidity math over raw integer reserves
pub struct PclMath;

impl PclMath {
    /// Simulate a swap against a concentrated pool
    ///
    /// Reserves and offer are raw integer amounts at their asset precisions;
    /// amp values are plain (not pre-multiplied) and gamma is a small
    /// fraction such as `0.000145`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        offer_amount: &BigUint,
        offer_prec: u32,
        ask_ind: usize,
        ask_prec: u32,
        reserves: &[BigUint; 2],
        params: &PclParams,
        block_time: u64,
        amp_ramp: &RampedParameter,
        gamma_ramp: &RampedParameter,
    ) -> Result<PclSwapDetail, SwapError> {
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
        if params.price_scale.is_zero() {
            return Err(SwapError::InvalidPoolState(
                "price scale must be positive".to_string(),
            ));
        }
        if params.fee_gamma.is_zero() {
            return Err(SwapError::InvalidPoolState(
                "fee gamma must be positive".to_string(),
            ));
        }
        for (name, rate) in [
            ("mid fee", &params.mid_fee),
            ("out fee", &params.out_fee),
            ("total fee rate", &params.total_fee_rate),
        ] {
            if rate >= &Decimal::one() {
                return Err(SwapError::InvalidInput(format!(
                    "{name} {rate} must be below 1"
                )));
            }
        }
        if params.maker_fee_share > Decimal::one() {
            return Err(SwapError::InvalidInput(format!(
                "maker fee share {} must not exceed 1",
                params.maker_fee_share
            )));
        }

        let amp = amp_ramp.resolve(block_time)?;
        if amp.is_zero() {
            return Err(SwapError::InvalidInput(
                "amplification must be positive".to_string(),
            ));
        }
        let gamma = gamma_ramp.resolve(block_time)?;
        if gamma.is_zero() {
            return Err(SwapError::InvalidPoolState(
                "gamma must be positive".to_string(),
            ));
        }

        let offer = Decimal::with_precision(offer_amount.clone(), offer_prec)?;
        let xs = [
            Decimal::with_precision(
                reserves[0].clone(),
                if ask_ind == 0 { ask_prec } else { offer_prec },
            )?,
            Decimal::with_precision(
                reserves[1].clone(),
                if ask_ind == 1 { ask_prec } else { offer_prec },
            )?,
        ];

        // Internal representation: asset 1 rescaled into asset-0 units.
        let mut ixs = xs;
        ixs[1] = ixs[1].clone() * &params.price_scale;

        let d = Self::newton_d(&ixs, &amp, &gamma)?;

        let offer_ind = 1 - ask_ind;
        if offer_ind == 1 {
            ixs[1] = ixs[1].clone() + &(offer.clone() * &params.price_scale);
        } else {
            ixs[0] = ixs[0].clone() + &offer;
        }

        let new_y = Self::newton_y(&ixs, &amp, &gamma, &d, ask_ind)?;
        let mut dy = ixs[ask_ind].checked_sub(&new_y)?;
        ixs[ask_ind] = new_y;

        // Ideal return at the pool's quoted price; the shortfall against the
        // realized pre-fee return is the spread.
        let ideal_return = if ask_ind == 1 {
            dy = dy.checked_div(&params.price_scale)?;
            offer.checked_div(&params.price_scale)?
        } else {
            offer.clone() * &params.price_scale
        };
        let spread = ideal_return.saturating_sub(&dy);

        let mut fee_rate =
            Self::dynamic_fee(&ixs, &params.fee_gamma, &params.mid_fee, &params.out_fee)?;
        if fee_rate > params.total_fee_rate {
            fee_rate = params.total_fee_rate.clone();
        }
        let total_fee = fee_rate.clone() * &dy;
        let dy = dy.checked_sub(&total_fee)?;
        let maker_fee = total_fee.clone() * &params.maker_fee_share;

        Ok(PclSwapDetail {
            result: SwapResult {
                return_amount: dy.to_atomics(ask_prec)?,
                spread_amount: spread.to_atomics(ask_prec)?,
                commission_amount: total_fee.to_atomics(ask_prec)?,
            },
            maker_fee_amount: maker_fee.to_atomics(ask_prec)?,
            fee_rate,
        })
    }

    fn geometric_mean(x: &[Decimal; 2]) -> Decimal {
        (x[0].clone() * &x[1]).sqrt()
    }

    /// Curve residual `F(D, x)`; zero at the invariant
    fn f(
        d: &SignedDecimal,
        x: &[SignedDecimal; 2],
        a: &Decimal,
        gamma: &Decimal,
    ) -> Result<SignedDecimal, SwapError> {
        let mul = x[0].clone() * x[1].clone();
        let d_pow2 = d.pow(2);

        let k0 = (mul.clone() * N_POW2.clone()).checked_div(&d_pow2)?;
        let gamma_one = gamma.clone() + &Decimal::one();
        let k = (a.clone() * gamma.pow(2) * k0.clone())
            .checked_div(&(gamma_one - k0).pow(2))?;

        Ok(k.clone() * d.clone() * (x[0].clone() + x[1].clone()) + mul
            - k * d_pow2.clone()
            - d_pow2.checked_div(&SignedDecimal::from(N_POW2.clone()))?)
    }

    /// dF/dD
    fn df_dd(
        d: &SignedDecimal,
        x: &[SignedDecimal; 2],
        a: &Decimal,
        gamma: &Decimal,
    ) -> Result<SignedDecimal, SwapError> {
        let mul = x[0].clone() * x[1].clone();
        let a_gamma_pow2 = a.clone() * gamma.pow(2);

        let k0 = (mul.clone() * N_POW2.clone()).checked_div(&d.pow(2))?;
        let gamma_one = gamma.clone() + &Decimal::one();

        let gamma_one_k0 = gamma_one.clone() - k0.clone();
        let gamma_one_k0_pow2 = gamma_one_k0.pow(2);

        let k = (a_gamma_pow2.clone() * k0.clone()).checked_div(&gamma_one_k0_pow2)?;

        let k_d_denom =
            PADDING.clone() * d.pow(3) * gamma_one_k0_pow2.clone() * gamma_one_k0;
        let k_d = -mul * N.pow(3) * a_gamma_pow2 * (gamma_one + k0);
        let k_d_term = (k_d * d.clone() * PADDING.clone()).checked_div(&k_d_denom)?;

        Ok(
            (k_d_term.clone() + k.clone()) * (x[0].clone() + x[1].clone())
                - (k_d_term + N.clone() * k) * d.clone()
                - d.clone().checked_div(&SignedDecimal::from(N.clone()))?,
        )
    }

    /// Invariant `D` via Newton's method, seeded from the geometric mean
    fn newton_d(x: &[Decimal; 2], a: &Decimal, gamma: &Decimal) -> Result<Decimal, SwapError> {
        let mut d_prev: SignedDecimal = (N.clone() * Self::geometric_mean(x)).into();
        let xs = [SignedDecimal::from(&x[0]), SignedDecimal::from(&x[1])];

        for iter in 0..MAX_ITER {
            let d = d_prev.clone()
                - Self::f(&d_prev, &xs, a, gamma)?
                    .checked_div(&Self::df_dd(&d_prev, &xs, a, gamma)?)?;
            if d.diff(&d_prev) <= *TOL {
                trace!(iterations = iter + 1, d = %d, "concentrated invariant converged");
                return Ok(d.try_into()?);
            }
            d_prev = d;
        }

        Err(SwapError::ConvergenceFailure {
            context: "concentrated invariant",
            max_iter: MAX_ITER,
        })
    }

    /// dF/dx over the unknown side `i`
    fn df_dx(
        d: &Decimal,
        x: &[SignedDecimal; 2],
        a: &Decimal,
        gamma: &Decimal,
        i: usize,
    ) -> Result<SignedDecimal, SwapError> {
        let x_r = x[1 - i].clone();
        let d_pow2 = d.pow(2);

        let k0 = (x[0].clone() * x[1].clone() * N_POW2.clone())
            .checked_div(&SignedDecimal::from(&d_pow2))?;
        let gamma_one = gamma.clone() + &Decimal::one();
        let gamma_one_k0 = gamma_one.clone() - k0.clone();
        let gamma_one_k0_pow2 = gamma_one_k0.pow(2);
        let a_gamma_pow2 = a.clone() * gamma.pow(2);

        let k = (a_gamma_pow2.clone() * k0.clone()).checked_div(&gamma_one_k0_pow2)?;
        let k0_x = x_r.clone() * N_POW2.clone();
        let k_x = (k0_x * a_gamma_pow2 * (gamma_one + k0) * PADDING.clone()).checked_div(
            &(SignedDecimal::from(PADDING.clone() * &d_pow2) * gamma_one_k0 * gamma_one_k0_pow2),
        )?;

        Ok((k_x.clone() * (x[0].clone() + x[1].clone()) + k) * SignedDecimal::from(d) + x_r
            - k_x * d_pow2)
    }

    /// New balance of side `j` keeping `D` invariant, via Newton's method
    fn newton_y(
        xs: &[Decimal; 2],
        a: &Decimal,
        gamma: &Decimal,
        d: &Decimal,
        j: usize,
    ) -> Result<Decimal, SwapError> {
        let mut x = [SignedDecimal::from(&xs[0]), SignedDecimal::from(&xs[1])];
        let x0 = SignedDecimal::from(d.pow(2))
            .checked_div(&(N_POW2.clone() * x[1 - j].clone()))?;
        let mut xi_prev = x0.clone();
        x[j] = x0;
        let d_signed = SignedDecimal::from(d);

        for iter in 0..MAX_ITER {
            let xi = xi_prev.clone()
                - Self::f(&d_signed, &x, a, gamma)?
                    .checked_div(&Self::df_dx(d, &x, a, gamma, j)?)?;
            if xi.diff(&xi_prev) <= *TOL {
                trace!(iterations = iter + 1, y = %xi, "concentrated balance converged");
                return Ok(xi.try_into()?);
            }
            x[j] = xi.clone();
            xi_prev = xi;
        }

        Err(SwapError::ConvergenceFailure {
            context: "concentrated balance",
            max_iter: MAX_ITER,
        })
    }

    /// Fee rate interpolated between `mid_fee` (balanced pool) and `out_fee`
    /// (imbalanced pool)
    fn dynamic_fee(
        xs: &[Decimal; 2],
        fee_gamma: &Decimal,
        mid_fee: &Decimal,
        out_fee: &Decimal,
    ) -> Result<Decimal, SwapError> {
        let sum = xs[0].clone() + &xs[1];
        // k0 = N^2 * x0 * x1 / sum^2, folded one balance at a time
        let mut k = Decimal::one();
        for x in xs {
            k = (k * &*N * x).checked_div(&sum)?;
        }
        k = fee_gamma
            .clone()
            .checked_div(&(fee_gamma.clone() + &Decimal::one()).checked_sub(&k)?)?;
        if k <= *FEE_TOL {
            k = Decimal::zero();
        }
        Ok(k.clone() * mid_fee + (Decimal::one().checked_sub(&k)?) * out_fee)
    }
}
