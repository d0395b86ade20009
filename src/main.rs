use anyhow::Context;
use bigdecimal::BigDecimal;
use bill_calc::batch::{price_batch, read_batch};
use bill_calc::billing_period::BillingPeriod;
use bill_calc::render::{Statement, format_amount};
use bill_calc::store::{BillMetadata, BillRecord, BillStore, UpsertOutcome};
use bill_calc::usage_data::{parse_quantity, parse_rate, parse_tariff};
use bill_calc::{RateOverrides, RateTable, UsageInput, compute_charges};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Electricity bill calculator.
/// Prices peak/off-peak energy, maximum demand, and fuel adjustment against the tariff,
/// applies the rebate and surcharge, and rounds the total to the nearest payable 5 cents.
#[derive(Parser, Debug)]
#[command(name = "bill-calc", version, long_about)]
struct BillCalc {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single bill and print the itemized statement.
    Calculate(CalculateArgs),
    /// Price every tenant in a usage CSV.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[command(flatten)]
    usage: UsageArgs,
    #[command(flatten)]
    metadata: MetadataArgs,
    #[command(flatten)]
    rates: RateArgs,
    /// JSON file to save the bill into. A bill with the same id is replaced.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// CSV with a `TENANT,PEAK (kWh),OFF-PEAK (kWh),TOTAL (kWh),MAX DEMAND (kW),FUEL RATE`
    /// header row. Anything above the header row is skipped.
    #[arg(long_help)]
    usage_csv: PathBuf,
    #[command(flatten)]
    rates: RateArgs,
}

/// Metered usage. Missing, unparsable, or negative values count as zero.
#[derive(Args, Debug)]
struct UsageArgs {
    /// Peak energy consumed, in kWh.
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_quantity)]
    peak: BigDecimal,
    /// Off-peak energy consumed, in kWh.
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_quantity)]
    off_peak: BigDecimal,
    /// Total energy consumed, in kWh.
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_quantity)]
    total: BigDecimal,
    /// Maximum demand, in kW.
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_quantity)]
    max_demand: BigDecimal,
    /// Fuel adjustment for this bill, in dollars per kWh. Defaults to the tariff's rate.
    /// Negative values are credits.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_rate)]
    fuel_rate: Option<BigDecimal>,
}

impl UsageArgs {
    fn to_usage(&self) -> UsageInput {
        UsageInput {
            peak: self.peak.clone(),
            off_peak: self.off_peak.clone(),
            total: self.total.clone(),
            max_demand: self.max_demand.clone(),
            fuel_adjustment_rate: self.fuel_rate.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct MetadataArgs {
    #[arg(long, default_value = "")]
    tenant: String,
    #[arg(long, default_value = "")]
    premises: String,
    #[arg(long, default_value = "")]
    bill_date: String,
    #[arg(long, default_value = "")]
    account: String,
    #[arg(long, default_value = "")]
    meter: String,
    /// First day of the billing period, as YYYY-MM-DD.
    #[arg(long, requires = "period_end")]
    period_start: Option<String>,
    /// Last day of the billing period, as YYYY-MM-DD.
    #[arg(long, requires = "period_start")]
    period_end: Option<String>,
}

impl MetadataArgs {
    fn to_metadata(&self) -> anyhow::Result<BillMetadata> {
        let period = match (&self.period_start, &self.period_end) {
            (Some(start), Some(end)) => Some(BillingPeriod::parse(start, end)?),
            _ => None,
        };
        Ok(BillMetadata {
            tenant_name: self.tenant.clone(),
            premise_address: self.premises.clone(),
            bill_date: self.bill_date.clone(),
            account_number: self.account.clone(),
            meter_number: self.meter.clone(),
            period,
        })
    }
}

#[derive(Args, Debug)]
struct RateArgs {
    #[arg(
        long,
        value_parser = parse_tariff,
        long_help = rate_help("peak energy", "dollars per kWh")
    )]
    peak_rate: Option<BigDecimal>,
    #[arg(
        long,
        value_parser = parse_tariff,
        long_help = rate_help("off-peak energy", "dollars per kWh")
    )]
    off_peak_rate: Option<BigDecimal>,
    #[arg(long, value_parser = parse_tariff, long_help = rate_help("capacity", "dollars per kW"))]
    capacity_rate: Option<BigDecimal>,
    #[arg(long, value_parser = parse_tariff, long_help = rate_help("network", "dollars per kW"))]
    network_rate: Option<BigDecimal>,
    #[arg(long, value_parser = parse_tariff, long_help = rate_help("retail", "dollars per bill"))]
    retail_fee: Option<BigDecimal>,
    #[arg(
        long,
        value_parser = parse_tariff,
        long_help = rate_help("rebate", "a fraction, e.g. 0.10")
    )]
    rebate: Option<BigDecimal>,
    #[arg(
        long,
        value_parser = parse_tariff,
        long_help = rate_help("surcharge", "a fraction, e.g. 0.016")
    )]
    surcharge: Option<BigDecimal>,
    #[arg(
        long,
        allow_negative_numbers = true,
        value_parser = parse_tariff,
        long_help = rate_help("default fuel adjustment", "dollars per kWh")
    )]
    fuel_adjustment_rate: Option<BigDecimal>,
}

fn rate_help(rate: &str, unit: &str) -> String {
    format!(
        "Your {} rate, in {}. \
         Typically you can leave this out and the program will use its built-in tariff. \
         However, if the utility has changed its rates, you need to specify them manually.",
        rate, unit
    )
}

impl RateArgs {
    fn to_rates(&self) -> RateTable {
        RateTable::default().with_overrides(RateOverrides {
            peak_energy: self.peak_rate.clone(),
            off_peak_energy: self.off_peak_rate.clone(),
            capacity: self.capacity_rate.clone(),
            network: self.network_rate.clone(),
            retail: self.retail_fee.clone(),
            rebate: self.rebate.clone(),
            surcharge: self.surcharge.clone(),
            fuel_adjustment: self.fuel_adjustment_rate.clone(),
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match BillCalc::parse().command {
        Command::Calculate(args) => calculate(args),
        Command::Batch(args) => batch(args),
    }
}

fn calculate(args: CalculateArgs) -> anyhow::Result<()> {
    let rates = args.rates.to_rates();
    let usage = args.usage.to_usage();
    let metadata = args.metadata.to_metadata()?;

    let bill = compute_charges(&usage, &rates);
    print!("{}", Statement::new(Some(&metadata), &usage, &bill));

    if let Some(path) = args.save {
        let store = BillStore::new(path);
        let record = BillRecord::new(metadata, &usage, &bill);
        let id = record.id.clone();
        let outcome = store
            .upsert(record)
            .with_context(|| format!("saving bill to {}", store.path().display()))?;
        match outcome {
            UpsertOutcome::Inserted => eprintln!("Saved bill {}", id),
            UpsertOutcome::Replaced => eprintln!("Updated bill {}", id),
        }
    }
    Ok(())
}

fn batch(args: BatchArgs) -> anyhow::Result<()> {
    let rates = args.rates.to_rates();
    let entries = read_batch(&args.usage_csv)
        .with_context(|| format!("reading {}", args.usage_csv.display()))?;
    eprintln!("Found {} usage entries", entries.len());

    let report = price_batch(entries, &rates);
    for (entry, bill) in &report.bills {
        let metadata = BillMetadata {
            tenant_name: entry.tenant.clone(),
            ..Default::default()
        };
        println!("{}", Statement::new(Some(&metadata), &entry.usage, bill));
    }
    eprintln!(
        "Total billed for {} tenants: ${}",
        report.bills.len(),
        format_amount(&report.total)
    );
    Ok(())
}
