use bigdecimal::BigDecimal;

/// Tariff applied to every bill. Built once and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    /// Dollars per peak kWh.
    pub peak_energy: BigDecimal,
    /// Dollars per off-peak kWh.
    pub off_peak_energy: BigDecimal,
    /// Dollars per kW of maximum demand.
    pub capacity: BigDecimal,
    /// Dollars per kW of maximum demand for network use.
    pub network: BigDecimal,
    /// Flat retail fee per bill.
    pub retail: BigDecimal,
    /// Fraction of the usage charges given back as a rebate.
    pub rebate: BigDecimal,
    /// Fraction levied on the post-rebate usage charges.
    pub surcharge: BigDecimal,
    /// Default per-kWh fuel adjustment, used when a bill does not supply its own.
    pub fuel_adjustment: BigDecimal,
}

fn decimal(digits: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(digits.into(), scale)
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            peak_energy: decimal(3132, 4),
            off_peak_energy: decimal(2723, 4),
            capacity: decimal(3019, 2),
            network: decimal(6687, 2),
            retail: decimal(20000, 2),
            rebate: decimal(10, 2),
            surcharge: decimal(16, 3),
            fuel_adjustment: decimal(0, 2),
        }
    }
}

/// Individual tariffs to replace in a [`RateTable`], e.g. when the utility publishes new rates
/// before the built-in table is updated.
#[derive(Debug, Clone, Default)]
pub struct RateOverrides {
    pub peak_energy: Option<BigDecimal>,
    pub off_peak_energy: Option<BigDecimal>,
    pub capacity: Option<BigDecimal>,
    pub network: Option<BigDecimal>,
    pub retail: Option<BigDecimal>,
    pub rebate: Option<BigDecimal>,
    pub surcharge: Option<BigDecimal>,
    pub fuel_adjustment: Option<BigDecimal>,
}

impl RateTable {
    /// Returns a copy of this table with every given override applied.
    pub fn with_overrides(&self, overrides: RateOverrides) -> Self {
        let pick =
            |value: Option<BigDecimal>, base: &BigDecimal| value.unwrap_or_else(|| base.clone());
        Self {
            peak_energy: pick(overrides.peak_energy, &self.peak_energy),
            off_peak_energy: pick(overrides.off_peak_energy, &self.off_peak_energy),
            capacity: pick(overrides.capacity, &self.capacity),
            network: pick(overrides.network, &self.network),
            retail: pick(overrides.retail, &self.retail),
            rebate: pick(overrides.rebate, &self.rebate),
            surcharge: pick(overrides.surcharge, &self.surcharge),
            fuel_adjustment: pick(overrides.fuel_adjustment, &self.fuel_adjustment),
        }
    }
}
