//! String-boundary swap facade
//!
//! Entry points take every numeric argument as a decimal string and return
//! the swap result as a JSON object of decimal strings. The boundary exists
//! so that callers behind an FFI or serialization layer never round-trip a
//! value through binary floating point; parsing preserves the full given
//! precision. The facade only validates and coerces; curve semantics live in
//! the curve modules and their failures surface unchanged.

use num_bigint::BigUint;
use tracing::debug;

use numeric::Decimal;

use crate::concentrated::{PclMath, PclParams};
use crate::error::SwapError;
use crate::ramp::RampedParameter;
use crate::stable::StableMath;
use crate::xyk::XykMath;

/// Simulate a constant-product swap
///
/// `reserves_json` is a JSON array of exactly two unsigned integer strings.
pub fn xyk_swap(
    offer_amount: &str,
    ask_index: &str,
    reserves_json: &str,
    fee_rate: &str,
) -> Result<String, SwapError> {
    debug!(offer_amount, ask_index, "xyk swap requested");

    let offer = parse_uint("offer_amount", offer_amount)?;
    let ask_ind = parse_index(ask_index)?;
    let reserves = parse_reserves(reserves_json)?;
    let fee = parse_fee("fee_rate", fee_rate)?;

    let result = XykMath::swap(&offer, ask_ind, &reserves, &fee)?;
    Ok(to_json(&result))
}

/// Simulate a stableswap swap with a ramped amplification coefficient
///
/// Amp values are raw on-chain units (`A * 100`); precisions and times are
/// unsigned integer strings.
#[allow(clippy::too_many_arguments)]
pub fn stable_swap(
    offer_amount: &str,
    offer_prec: &str,
    ask_index: &str,
    ask_prec: &str,
    reserves_json: &str,
    fee_rate: &str,
    block_time: &str,
    init_amp_time: &str,
    init_amp: &str,
    next_amp_time: &str,
    next_amp: &str,
) -> Result<String, SwapError> {
    debug!(offer_amount, ask_index, block_time, "stable swap requested");

    let offer = parse_uint("offer_amount", offer_amount)?;
    let offer_prec = parse_u32("offer_prec", offer_prec)?;
    let ask_ind = parse_index(ask_index)?;
    let ask_prec = parse_u32("ask_prec", ask_prec)?;
    let reserves = parse_reserves(reserves_json)?;
    let fee = parse_fee("fee_rate", fee_rate)?;
    let block_time = parse_u64("block_time", block_time)?;
    let amp_ramp = RampedParameter {
        initial_value: parse_decimal("init_amp", init_amp)?,
        initial_time: parse_u64("init_amp_time", init_amp_time)?,
        future_value: parse_decimal("next_amp", next_amp)?,
        future_time: parse_u64("next_amp_time", next_amp_time)?,
    };

    let result = StableMath::swap(
        &offer, offer_prec, ask_ind, ask_prec, &reserves, &fee, block_time, &amp_ramp,
    )?;
    Ok(to_json(&result))
}

/// Simulate a swap against a concentrated-liquidity pool
///
/// Amp and gamma share one ramp window; the protocol's maker fee share does
/// not affect the returned amounts and is fixed at zero here.
#[allow(clippy::too_many_arguments)]
pub fn concentrated_swap(
    offer_amount: &str,
    offer_prec: &str,
    ask_index: &str,
    ask_prec: &str,
    reserves_json: &str,
    total_fee_rate: &str,
    price_scale: &str,
    fee_gamma: &str,
    mid_fee: &str,
    out_fee: &str,
    block_time: &str,
    initial_time: &str,
    initial_amp: &str,
    initial_gamma: &str,
    future_time: &str,
    future_amp: &str,
    future_gamma: &str,
) -> Result<String, SwapError> {
    debug!(
        offer_amount,
        ask_index, block_time, "concentrated swap requested"
    );

    let offer = parse_uint("offer_amount", offer_amount)?;
    let offer_prec = parse_u32("offer_prec", offer_prec)?;
    let ask_ind = parse_index(ask_index)?;
    let ask_prec = parse_u32("ask_prec", ask_prec)?;
    let reserves = parse_reserves(reserves_json)?;
    let params = PclParams {
        price_scale: parse_decimal("price_scale", price_scale)?,
        fee_gamma: parse_decimal("fee_gamma", fee_gamma)?,
        mid_fee: parse_fee("mid_fee", mid_fee)?,
        out_fee: parse_fee("out_fee", out_fee)?,
        maker_fee_share: Decimal::zero(),
        total_fee_rate: parse_fee("total_fee_rate", total_fee_rate)?,
    };
    let block_time = parse_u64("block_time", block_time)?;
    let initial_time = parse_u64("initial_time", initial_time)?;
    let future_time = parse_u64("future_time", future_time)?;
    let amp_ramp = RampedParameter {
        initial_value: parse_decimal("initial_amp", initial_amp)?,
        initial_time,
        future_value: parse_decimal("future_amp", future_amp)?,
        future_time,
    };
    let gamma_ramp = RampedParameter {
        initial_value: parse_decimal("initial_gamma", initial_gamma)?,
        initial_time,
        future_value: parse_decimal("future_gamma", future_gamma)?,
        future_time,
    };

    let detail = PclMath::swap(
        &offer, offer_prec, ask_ind, ask_prec, &reserves, &params, block_time, &amp_ramp,
        &gamma_ramp,
    )?;
    Ok(to_json(&detail.result))
}

fn to_json(result: &crate::SwapResult) -> String {
    serde_json::to_string(result).expect("SwapResult serialization is infallible")
}

fn parse_uint(field: &str, value: &str) -> Result<BigUint, SwapError> {
    if let Some(magnitude) = value.strip_prefix('-') {
        if !magnitude.is_empty() && magnitude.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SwapError::InvalidInput(format!(
                "{field} must not be negative, got {value}"
            )));
        }
    }
    value.parse().map_err(|_| {
        SwapError::InvalidNumericLiteral(format!("{field}: {value:?} is not an unsigned integer"))
    })
}

fn parse_index(value: &str) -> Result<usize, SwapError> {
    value.parse().map_err(|_| {
        SwapError::InvalidNumericLiteral(format!(
            "ask_index: {value:?} is not an unsigned integer"
        ))
    })
}

fn parse_u32(field: &str, value: &str) -> Result<u32, SwapError> {
    value.parse().map_err(|_| {
        SwapError::InvalidNumericLiteral(format!("{field}: {value:?} is not an unsigned integer"))
    })
}

fn parse_u64(field: &str, value: &str) -> Result<u64, SwapError> {
    value.parse().map_err(|_| {
        SwapError::InvalidNumericLiteral(format!("{field}: {value:?} is not a unix timestamp"))
    })
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, SwapError> {
    value.parse::<Decimal>().map_err(|_| {
        SwapError::InvalidNumericLiteral(format!("{field}: {value:?} is not a decimal"))
    })
}

/// Fee rates are validated here as well as in the curves so that a bad rate
/// is reported against its field name.
fn parse_fee(field: &str, value: &str) -> Result<Decimal, SwapError> {
    let rate = parse_decimal(field, value)?;
    if rate >= Decimal::one() {
        return Err(SwapError::InvalidInput(format!(
            "{field} {rate} must lie in [0, 1)"
        )));
    }
    Ok(rate)
}

fn parse_reserves(reserves_json: &str) -> Result<[BigUint; 2], SwapError> {
    let raw: Vec<String> = serde_json::from_str(reserves_json).map_err(|err| {
        SwapError::InvalidInput(format!("reserves must be a JSON array of strings: {err}"))
    })?;
    if raw.len() != 2 {
        return Err(SwapError::InvalidInput(format!(
            "expected 2 reserves, got {}",
            raw.len()
        )));
    }
    Ok([
        parse_uint("reserves[0]", &raw[0])?,
        parse_uint("reserves[1]", &raw[1])?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const XYK_RESERVES: &str = r#"["499395163721","5007277236"]"#;
    const STABLE_RESERVES: &str = r#"["530256812","100446728"]"#;

    #[test]
    fn xyk_round_trip() {
        let json = xyk_swap("1251819309", "0", XYK_RESERVES, "0.003").unwrap();
        assert_eq!(
            json,
            r#"{"return_amount":"99579395646","spread_amount":"24969758186","commission_amount":"299637098"}"#
        );
    }

    #[test]
    fn stable_round_trip() {
        let json = stable_swap(
            "25111682",
            "6",
            "0",
            "6",
            STABLE_RESERVES,
            "0.0005",
            "1692147376",
            "0",
            "10000",
            "0",
            "10000",
        )
        .unwrap();
        assert_eq!(
            json,
            r#"{"return_amount":"26021217","spread_amount":"0","commission_amount":"13017"}"#
        );
    }

    #[test]
    fn concentrated_round_trip() {
        let json = concentrated_swap(
            "1000000000",
            "6",
            "1",
            "6",
            r#"["450000000000","100000000000"]"#,
            "0.9",
            "4.5",
            "0.00023",
            "0.0026",
            "0.0045",
            "1692147376",
            "0",
            "10",
            "0.000145",
            "0",
            "100",
            "0.000145",
        );
        // Frozen window with differing amp endpoints is rejected.
        assert!(matches!(json, Err(SwapError::InvalidRampConfig(_))));

        let json = concentrated_swap(
            "1000000000",
            "6",
            "1",
            "6",
            r#"["450000000000","100000000000"]"#,
            "0.9",
            "4.5",
            "0.00023",
            "0.0026",
            "0.0045",
            "1692147376",
            "0",
            "10",
            "0.000145",
            "0",
            "10",
            "0.000145",
        )
        .unwrap();
        assert_eq!(
            json,
            r#"{"return_amount":"221610656","spread_amount":"24979","commission_amount":"586585"}"#
        );
    }

    #[test]
    fn zero_offer_fails_on_every_curve() {
        assert!(matches!(
            xyk_swap("0", "0", XYK_RESERVES, "0.003"),
            Err(SwapError::InvalidInput(_))
        ));
        assert!(matches!(
            stable_swap(
                "0",
                "6",
                "0",
                "6",
                STABLE_RESERVES,
                "0.0005",
                "0",
                "0",
                "10000",
                "0",
                "10000",
            ),
            Err(SwapError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_amounts_are_invalid_input_not_literals() {
        assert!(matches!(
            xyk_swap("-5", "0", XYK_RESERVES, "0.003"),
            Err(SwapError::InvalidInput(_))
        ));
        assert!(matches!(
            xyk_swap("1", "0", r#"["-1","5007277236"]"#, "0.003"),
            Err(SwapError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_numbers_are_literal_errors() {
        assert!(matches!(
            xyk_swap("12x", "0", XYK_RESERVES, "0.003"),
            Err(SwapError::InvalidNumericLiteral(_))
        ));
        assert!(matches!(
            xyk_swap("1", "zero", XYK_RESERVES, "0.003"),
            Err(SwapError::InvalidNumericLiteral(_))
        ));
        assert!(matches!(
            xyk_swap("1", "0", XYK_RESERVES, "0..3"),
            Err(SwapError::InvalidNumericLiteral(_))
        ));
        assert!(matches!(
            xyk_swap("1", "0", XYK_RESERVES, "1e-3"),
            Err(SwapError::InvalidNumericLiteral(_))
        ));
    }

    #[test]
    fn malformed_reserves_are_invalid_input() {
        for bad in [
            "[]",
            r#"["1"]"#,
            r#"["1","2","3"]"#,
            r#"[1,2]"#,
            "not json",
        ] {
            assert!(matches!(
                xyk_swap("1", "0", bad, "0.003"),
                Err(SwapError::InvalidInput(_)),
            ), "reserves {bad:?} should be invalid input");
        }
    }

    #[test]
    fn degenerate_amp_ramp_is_rejected() {
        let result = stable_swap(
            "25111682",
            "6",
            "0",
            "6",
            STABLE_RESERVES,
            "0.0005",
            "1692147376",
            "1692039296",
            "10000",
            "1692039296",
            "20000",
        );
        assert!(matches!(result, Err(SwapError::InvalidRampConfig(_))));
    }

    #[test]
    fn fee_out_of_range_names_the_field() {
        let err = xyk_swap("1", "0", XYK_RESERVES, "1.5").unwrap_err();
        match err {
            SwapError::InvalidInput(msg) => assert!(msg.contains("fee_rate")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
