use crate::error::BillError;
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

/// Metered quantities for one billing period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsageInput {
    /// Energy consumed during peak hours, in kWh.
    pub peak: BigDecimal,
    /// Energy consumed during off-peak hours, in kWh.
    pub off_peak: BigDecimal,
    /// Total energy consumed, in kWh. The fuel adjustment is charged on this.
    pub total: BigDecimal,
    /// Highest power draw in the period, in kW.
    pub max_demand: BigDecimal,
    /// Per-kWh fuel adjustment for this bill. Falls back to the rate table's value when absent.
    pub fuel_adjustment_rate: Option<BigDecimal>,
}

/// Largest decimal exponent, in either direction, accepted from user input. Rescaling a value
/// with a larger exponent costs time proportional to the exponent.
pub const MAX_EXPONENT: i64 = 32;

fn parse_bounded(raw: &str) -> Option<BigDecimal> {
    let value = BigDecimal::from_str(raw.trim()).ok()?;
    let (_, scale) = value.as_bigint_and_exponent();
    if scale.abs() > MAX_EXPONENT {
        tracing::debug!(raw, scale, "exponent out of range");
        return None;
    }
    Some(value)
}

/// Turns raw user input into a usable quantity.
///
/// Blank, unparsable, out-of-range, and negative values all become zero, so the calculator
/// only ever sees non-negative numbers.
pub fn coerce_quantity(raw: &str) -> BigDecimal {
    match parse_bounded(raw) {
        Some(value) if value >= BigDecimal::zero() => value,
        Some(value) => {
            tracing::debug!(%value, "negative quantity coerced to zero");
            BigDecimal::zero()
        }
        None => {
            if !raw.trim().is_empty() {
                tracing::debug!(raw, "unparsable quantity coerced to zero");
            }
            BigDecimal::zero()
        }
    }
}

/// Turns a raw per-bill rate into a usable value.
///
/// Blank input means "no rate given". Unparsable or out-of-range input counts as zero.
/// Negative rates are kept, since a fuel adjustment can be a credit.
pub fn coerce_rate(raw: &str) -> Option<BigDecimal> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(parse_bounded(raw).unwrap_or_else(|| {
        tracing::debug!(raw, "unparsable rate coerced to zero");
        BigDecimal::zero()
    }))
}

/// Infallible clap value parser built on [`coerce_quantity`].
pub fn parse_quantity(raw: &str) -> Result<BigDecimal, std::convert::Infallible> {
    Ok(coerce_quantity(raw))
}

/// Infallible clap value parser built on [`coerce_rate`]. An empty value counts as zero.
pub fn parse_rate(raw: &str) -> Result<BigDecimal, std::convert::Infallible> {
    Ok(coerce_rate(raw).unwrap_or_else(BigDecimal::zero))
}

/// Strict clap value parser for tariff overrides.
pub fn parse_tariff(raw: &str) -> Result<BigDecimal, BillError> {
    parse_bounded(raw).ok_or_else(|| BillError::InvalidRate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_quantities_pass_through() {
        assert_eq!(coerce_quantity("100"), BigDecimal::from(100));
        assert_eq!(coerce_quantity(" 13.615 "), BigDecimal::from_str("13.615").unwrap());
    }

    #[test]
    fn invalid_quantities_become_zero() {
        for raw in ["", "   ", "abc", "-5", "-0.01", "NaN", "inf", "12kWh"] {
            assert_eq!(coerce_quantity(raw), BigDecimal::zero(), "input {raw:?}");
        }
    }

    #[test]
    fn huge_exponents_become_zero() {
        for raw in ["1e-20000000", "1e20000000", "5E-33", "1e33"] {
            assert_eq!(coerce_quantity(raw), BigDecimal::zero(), "input {raw:?}");
        }
        assert_eq!(coerce_quantity("1e-32"), BigDecimal::from_str("1e-32").unwrap());
        assert!(parse_tariff("1e-20000000").is_err());
        assert_eq!(parse_tariff("0.3132").unwrap(), BigDecimal::from_str("0.3132").unwrap());
    }

    #[test]
    fn negative_rates_are_kept() {
        assert_eq!(coerce_rate("-0.0145"), Some(BigDecimal::from_str("-0.0145").unwrap()));
        assert_eq!(coerce_rate(" 0.02 "), Some(BigDecimal::from_str("0.02").unwrap()));
        assert_eq!(parse_rate("-0.01").unwrap(), BigDecimal::from_str("-0.01").unwrap());
    }

    #[test]
    fn blank_rate_is_absent_and_junk_rate_is_zero() {
        assert_eq!(coerce_rate(""), None);
        assert_eq!(coerce_rate("  "), None);
        assert_eq!(coerce_rate("abc"), Some(BigDecimal::zero()));
        assert_eq!(coerce_rate("1e-20000000"), Some(BigDecimal::zero()));
    }
}
