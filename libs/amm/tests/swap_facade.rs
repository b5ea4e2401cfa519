//! End-to-end tests for the string-boundary swap facade
//!
//! Exercises the public entry points the way an FFI caller would: decimal
//! strings in, JSON out, structured errors for every failure class.

use amm::api::{concentrated_swap, stable_swap, xyk_swap};
use amm::{SwapError, SwapResult};

const XYK_RESERVES: &str = r#"["499395163721","5007277236"]"#;
const STABLE_RESERVES: &str = r#"["530256812","100446728"]"#;
const PCL_RESERVES: &str = r#"["450000000000","100000000000"]"#;

fn pcl_swap(offer: &str, fee_pair: (&str, &str)) -> Result<String, SwapError> {
    concentrated_swap(
        offer,
        "6",
        "1",
        "6",
        PCL_RESERVES,
        "0.9",
        "4.5",
        "0.00023",
        fee_pair.0,
        fee_pair.1,
        "1692147376",
        "0",
        "10",
        "0.000145",
        "0",
        "10",
        "0.000145",
    )
}

#[test]
fn xyk_quote_matches_reference() {
    let json = xyk_swap("1251819309", "0", XYK_RESERVES, "0.003").unwrap();
    let result: SwapResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result.return_amount, 99579395646u64.into());
    assert_eq!(result.spread_amount, 24969758186u64.into());
    assert_eq!(result.commission_amount, 299637098u64.into());
}

#[test]
fn stable_quote_matches_reference() {
    let json = stable_swap(
        "132564203",
        "6",
        "1",
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
    let result: SwapResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result.return_amount, 90612065u64.into());
    assert_eq!(result.spread_amount, 41906810u64.into());
    assert_eq!(result.commission_amount, 45328u64.into());
}

#[test]
fn concentrated_quote_matches_reference() {
    let json = pcl_swap("1000000000", ("0.0026", "0.0045")).unwrap();
    assert_eq!(
        json,
        r#"{"return_amount":"221610656","spread_amount":"24979","commission_amount":"586585"}"#
    );
}

#[test]
fn zero_fee_returns_pre_fee_amount_everywhere() {
    let json = xyk_swap("1251819309", "0", XYK_RESERVES, "0").unwrap();
    let result: SwapResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result.return_amount, 99879032744u64.into());
    assert_eq!(result.commission_amount, 0u64.into());

    let json = stable_swap(
        "25111682",
        "6",
        "0",
        "6",
        STABLE_RESERVES,
        "0",
        "1692147376",
        "0",
        "10000",
        "0",
        "10000",
    )
    .unwrap();
    let result: SwapResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result.return_amount, 26034234u64.into());
    assert_eq!(result.commission_amount, 0u64.into());

    let json = pcl_swap("1000000000", ("0", "0")).unwrap();
    let result: SwapResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result.return_amount, 222197242u64.into());
    assert_eq!(result.commission_amount, 0u64.into());
}

#[test]
fn zero_offer_is_invalid_input_on_every_curve() {
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
            "10000"
        ),
        Err(SwapError::InvalidInput(_))
    ));
    assert!(matches!(
        pcl_swap("0", ("0.0026", "0.0045")),
        Err(SwapError::InvalidInput(_))
    ));
}

#[test]
fn degenerate_ramp_is_invalid_ramp_config() {
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
fn unparsable_strings_are_literal_errors() {
    assert!(matches!(
        stable_swap(
            "25111682",
            "six",
            "0",
            "6",
            STABLE_RESERVES,
            "0.0005",
            "0",
            "0",
            "10000",
            "0",
            "10000"
        ),
        Err(SwapError::InvalidNumericLiteral(_))
    ));
    assert!(matches!(
        pcl_swap("1000000000", ("0.00x26", "0.0045")),
        Err(SwapError::InvalidNumericLiteral(_))
    ));
}

#[test]
fn extreme_imbalance_surfaces_convergence_failure() {
    let result = concentrated_swap(
        "10000",
        "6",
        "1",
        "6",
        r#"["1000000","1000000000000000"]"#,
        "0.9",
        "4.5",
        "0.00023",
        "0.0026",
        "0.0045",
        "0",
        "0",
        "10",
        "0.000145",
        "0",
        "10",
        "0.000145",
    );
    assert!(matches!(result, Err(SwapError::ConvergenceFailure { .. })));
}
