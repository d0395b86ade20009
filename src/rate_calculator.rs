use crate::rates::RateTable;
use crate::rounding::{RoundingAdjustment, rounding_adjustment};
use crate::usage_data::UsageInput;
use bigdecimal::BigDecimal;

/// Itemized charges for one bill. Amounts are unrounded; formatting is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeBreakdown {
    pub peak: BigDecimal,
    pub off_peak: BigDecimal,
    pub fuel_adjustment: BigDecimal,
    pub capacity: BigDecimal,
    pub network: BigDecimal,
    pub retail: BigDecimal,
    /// Positive amount subtracted from the usage charges.
    pub rebate: BigDecimal,
    /// Usage charges less rebate, plus fuel adjustment and retail fee.
    pub current_month_charge: BigDecimal,
    pub surcharge: BigDecimal,
    /// Current month charge plus surcharge, before rounding.
    pub subtotal: BigDecimal,
    pub rounding: RoundingAdjustment,
    pub grand_total: BigDecimal,
}

/// Prices a bill.
///
/// The rebate and the surcharge are both based on the energy, capacity and network charges
/// only. The retail fee and the fuel adjustment are added after the rebate and are never
/// levied.
pub fn compute_charges(usage: &UsageInput, rates: &RateTable) -> ChargeBreakdown {
    let fuel_rate = usage
        .fuel_adjustment_rate
        .as_ref()
        .unwrap_or(&rates.fuel_adjustment);

    let peak = &usage.peak * &rates.peak_energy;
    let off_peak = &usage.off_peak * &rates.off_peak_energy;
    let capacity = &usage.max_demand * &rates.capacity;
    let network = &usage.max_demand * &rates.network;
    let retail = rates.retail.clone();
    let fuel_adjustment = &usage.total * fuel_rate;

    let base_charges = &peak + &off_peak + &capacity + &network;
    let rebate = &base_charges * &rates.rebate;
    let current_month_charge = &base_charges - &rebate + &fuel_adjustment + &retail;

    let discount = &base_charges * &rates.rebate;
    let surcharge = (&base_charges - discount) * &rates.surcharge;

    let subtotal = &current_month_charge + &surcharge;
    let rounding = rounding_adjustment(&subtotal);
    let grand_total = &subtotal + &rounding.amount;

    tracing::debug!(
        %fuel_rate,
        %fuel_adjustment,
        %subtotal,
        rounding = %rounding.amount,
        %grand_total,
        "computed charges"
    );

    ChargeBreakdown {
        peak,
        off_peak,
        fuel_adjustment,
        capacity,
        network,
        retail,
        rebate,
        current_month_charge,
        surcharge,
        subtotal,
        rounding,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;
    use std::str::FromStr;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn sample_usage() -> UsageInput {
        UsageInput {
            peak: dec("100"),
            off_peak: dec("50"),
            total: dec("150"),
            max_demand: dec("10"),
            fuel_adjustment_rate: Some(BigDecimal::zero()),
        }
    }

    #[test]
    fn reference_bill_itemizes_as_published() {
        let bill = compute_charges(&sample_usage(), &RateTable::default());
        assert_eq!(bill.peak, dec("31.32"));
        assert_eq!(bill.off_peak, dec("13.615"));
        assert_eq!(bill.capacity, dec("301.90"));
        assert_eq!(bill.network, dec("668.70"));
        assert_eq!(bill.retail, dec("200.00"));
        assert_eq!(bill.rebate, dec("101.5535"));
        assert_eq!(bill.fuel_adjustment, dec("0"));
        assert_eq!(bill.current_month_charge, dec("1113.9815"));
        assert_eq!(bill.surcharge, dec("14.623704"));
        assert_eq!(bill.subtotal, dec("1128.605204"));
        assert_eq!(bill.rounding.amount, dec("-0.01"));
        assert_eq!(bill.rounding.description, "-0.01");
        assert_eq!(bill.grand_total, dec("1128.595204"));
    }

    #[test]
    fn fuel_adjustment_is_not_rebated_or_levied() {
        let mut usage = sample_usage();
        usage.fuel_adjustment_rate = Some(dec("0.02"));
        let bill = compute_charges(&usage, &RateTable::default());
        assert_eq!(bill.fuel_adjustment, dec("3.00"));
        assert_eq!(bill.rebate, dec("101.5535"));
        assert_eq!(bill.surcharge, dec("14.623704"));
        assert_eq!(bill.current_month_charge, dec("1116.9815"));
    }

    #[test]
    fn per_bill_fuel_rate_overrides_table_default() {
        let rates = RateTable {
            fuel_adjustment: dec("0.01"),
            ..RateTable::default()
        };
        let mut usage = sample_usage();
        usage.fuel_adjustment_rate = None;
        assert_eq!(compute_charges(&usage, &rates).fuel_adjustment, dec("1.50"));

        usage.fuel_adjustment_rate = Some(dec("0.03"));
        assert_eq!(compute_charges(&usage, &rates).fuel_adjustment, dec("4.50"));
    }

    #[test]
    fn zero_usage_leaves_only_retail_fee() {
        let bill = compute_charges(&UsageInput::default(), &RateTable::default());
        for amount in [
            &bill.peak,
            &bill.off_peak,
            &bill.capacity,
            &bill.network,
            &bill.fuel_adjustment,
            &bill.rebate,
            &bill.surcharge,
        ] {
            assert!(amount.is_zero());
        }
        assert_eq!(bill.subtotal, dec("200"));
        assert_eq!(bill.rounding.description, "0.00");
        assert_eq!(bill.grand_total, dec("200"));
    }

    #[test]
    fn grand_total_is_subtotal_plus_rounding() {
        let usage = UsageInput {
            peak: dec("1234.5"),
            off_peak: dec("987.25"),
            total: dec("2221.75"),
            max_demand: dec("42.7"),
            fuel_adjustment_rate: Some(dec("0.0145")),
        };
        let bill = compute_charges(&usage, &RateTable::default());
        assert_eq!(bill.grand_total, &bill.subtotal + &bill.rounding.amount);
        assert_eq!(bill.peak, dec("1234.5") * dec("0.3132"));
    }
}
