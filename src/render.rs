use crate::rate_calculator::ChargeBreakdown;
use crate::store::BillMetadata;
use crate::usage_data::UsageInput;
use bigdecimal::{BigDecimal, RoundingMode};
use std::fmt;

/// Formats an amount the way it is printed on a bill: two decimals, half away from zero.
pub fn format_amount(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

/// Every field of a [`ChargeBreakdown`], ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBreakdown {
    pub peak: String,
    pub off_peak: String,
    pub fuel_adjustment: String,
    pub capacity: String,
    pub network: String,
    pub retail: String,
    /// Shown negated, e.g. `-101.55`.
    pub rebate: String,
    pub current_month_charge: String,
    pub surcharge: String,
    pub rounding_description: String,
    pub rounding_amount: String,
    pub grand_total: String,
}

impl From<&ChargeBreakdown> for DisplayBreakdown {
    fn from(bill: &ChargeBreakdown) -> Self {
        Self {
            peak: format_amount(&bill.peak),
            off_peak: format_amount(&bill.off_peak),
            fuel_adjustment: format_amount(&bill.fuel_adjustment),
            capacity: format_amount(&bill.capacity),
            network: format_amount(&bill.network),
            retail: format_amount(&bill.retail),
            rebate: format!("-{}", format_amount(&bill.rebate)),
            current_month_charge: format_amount(&bill.current_month_charge),
            surcharge: format_amount(&bill.surcharge),
            rounding_description: bill.rounding.description.clone(),
            rounding_amount: format_amount(&bill.rounding.amount),
            grand_total: format_amount(&bill.grand_total),
        }
    }
}

/// Plain-text itemized bill.
pub struct Statement<'a> {
    pub metadata: Option<&'a BillMetadata>,
    pub usage: &'a UsageInput,
    pub charges: DisplayBreakdown,
}

impl<'a> Statement<'a> {
    pub fn new(
        metadata: Option<&'a BillMetadata>,
        usage: &'a UsageInput,
        bill: &ChargeBreakdown,
    ) -> Self {
        Self {
            metadata,
            usage,
            charges: DisplayBreakdown::from(bill),
        }
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {label:<32}{value:>14}")
}

fn header(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        return Ok(());
    }
    writeln!(f, "{label:<16}{value}")
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(meta) = self.metadata {
            header(f, "Tenant:", &meta.tenant_name)?;
            header(f, "Premises:", &meta.premise_address)?;
            header(f, "Account no.:", &meta.account_number)?;
            header(f, "Meter no.:", &meta.meter_number)?;
            header(f, "Bill date:", &meta.bill_date)?;
            match &meta.period {
                Some(period) => header(f, "Billing period:", &period.to_string())?,
                None => header(f, "Billing period:", "not selected")?,
            }
            writeln!(f)?;
        }

        writeln!(f, "Usage")?;
        row(f, "Peak (kWh)", &format_amount(&self.usage.peak))?;
        row(f, "Off-peak (kWh)", &format_amount(&self.usage.off_peak))?;
        row(f, "Total (kWh)", &format_amount(&self.usage.total))?;
        row(f, "Maximum demand (kW)", &format_amount(&self.usage.max_demand))?;
        writeln!(f)?;

        let c = &self.charges;
        writeln!(f, "Charges")?;
        row(f, "Peak energy", &c.peak)?;
        row(f, "Off-peak energy", &c.off_peak)?;
        row(f, "Capacity", &c.capacity)?;
        row(f, "Network", &c.network)?;
        row(f, "Rebate", &c.rebate)?;
        row(f, "Fuel adjustment", &c.fuel_adjustment)?;
        row(f, "Retail", &c.retail)?;
        row(f, "Current month charge", &c.current_month_charge)?;
        row(f, "Surcharge", &c.surcharge)?;
        row(
            f,
            &format!("Rounding adjustment ({})", c.rounding_description),
            &c.rounding_amount,
        )?;
        row(f, "Grand total", &c.grand_total)
    }
}
