//! Time-ramped parameter resolution
//!
//! On-chain pools phase amplification (and, for concentrated pools, gamma)
//! changes in gradually over a time window. This module reinterprets that
//! wall-clock-coupled state as a pure `(ramp, timestamp) -> value` query so
//! the engine stays deterministic and testable without mocking time.

use numeric::Decimal;

use crate::error::SwapError;

/// Linear interpolation schedule between two parameter values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampedParameter {
    pub initial_value: Decimal,
    pub initial_time: u64,
    pub future_value: Decimal,
    pub future_time: u64,
}

impl RampedParameter {
    /// A parameter that never ramps
    pub fn flat(value: Decimal) -> Self {
        RampedParameter {
            initial_value: value.clone(),
            initial_time: 0,
            future_value: value,
            future_time: 0,
        }
    }

    /// Effective value at `block_time`
    ///
    /// Clamps to the endpoint values outside the window and interpolates
    /// linearly inside it, using the same truncating decimal arithmetic as
    /// the rest of the engine so two engines always agree at identical `t`.
    pub fn resolve(&self, block_time: u64) -> Result<Decimal, SwapError> {
        if self.future_time < self.initial_time {
            return Err(SwapError::InvalidRampConfig(format!(
                "ramp end {} precedes start {}",
                self.future_time, self.initial_time
            )));
        }
        if self.initial_time == self.future_time {
            if self.initial_value != self.future_value {
                return Err(SwapError::InvalidRampConfig(format!(
                    "zero-length ramp with differing values {} and {}",
                    self.initial_value, self.future_value
                )));
            }
            return Ok(self.initial_value.clone());
        }
        if block_time <= self.initial_time {
            return Ok(self.initial_value.clone());
        }
        if block_time >= self.future_time {
            return Ok(self.future_value.clone());
        }

        let elapsed = Decimal::from_integer(block_time - self.initial_time);
        let window = Decimal::from_integer(self.future_time - self.initial_time);

        // Branch on direction to stay within unsigned arithmetic, like the
        // on-chain amp schedule does.
        if self.future_value >= self.initial_value {
            let range = self.future_value.checked_sub(&self.initial_value)?;
            let step = (range * elapsed).checked_div(&window)?;
            Ok(self.initial_value.clone() + step)
        } else {
            let range = self.initial_value.checked_sub(&self.future_value)?;
            let step = (range * elapsed).checked_div(&window)?;
            Ok(self.initial_value.checked_sub(&step)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ramp(iv: &str, it: u64, fv: &str, ft: u64) -> RampedParameter {
        RampedParameter {
            initial_value: dec(iv),
            initial_time: it,
            future_value: dec(fv),
            future_time: ft,
        }
    }

    #[test]
    fn clamps_to_endpoints() {
        let r = ramp("100", 1000, "200", 2000);
        assert_eq!(r.resolve(0).unwrap(), dec("100"));
        assert_eq!(r.resolve(1000).unwrap(), dec("100"));
        assert_eq!(r.resolve(2000).unwrap(), dec("200"));
        assert_eq!(r.resolve(5000).unwrap(), dec("200"));
    }

    #[test]
    fn interpolates_ascending_and_descending() {
        let up = ramp("100", 1000, "200", 2000);
        assert_eq!(up.resolve(1500).unwrap(), dec("150"));
        assert_eq!(up.resolve(1250).unwrap(), dec("125"));

        let down = ramp("200", 1000, "100", 2000);
        assert_eq!(down.resolve(1500).unwrap(), dec("150"));
        assert_eq!(down.resolve(1750).unwrap(), dec("125"));
    }

    #[test]
    fn interpolation_truncates_like_the_chain() {
        // 1/3 of the way through a ramp of width 100: 100 * 500 / 1500
        let r = ramp("0", 0, "100", 1500);
        assert_eq!(
            r.resolve(500).unwrap().to_string(),
            "33.333333333333333333"
        );
    }

    #[test]
    fn degenerate_window_requires_equal_values() {
        let flat = ramp("10", 500, "10", 500);
        assert_eq!(flat.resolve(123).unwrap(), dec("10"));

        let broken = ramp("10", 500, "20", 500);
        assert!(matches!(
            broken.resolve(123),
            Err(SwapError::InvalidRampConfig(_))
        ));
    }

    #[test]
    fn reversed_window_is_rejected() {
        let r = ramp("10", 500, "20", 400);
        assert!(matches!(
            r.resolve(450),
            Err(SwapError::InvalidRampConfig(_))
        ));
    }

    #[test]
    fn flat_constructor_resolves_everywhere() {
        let r = RampedParameter::flat(dec("0.000145"));
        assert_eq!(r.resolve(0).unwrap(), dec("0.000145"));
        assert_eq!(r.resolve(u64::MAX).unwrap(), dec("0.000145"));
    }
}
