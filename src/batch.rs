use crate::error::BillError;
use crate::rate_calculator::{ChargeBreakdown, compute_charges};
use crate::rates::RateTable;
use crate::usage_data::{UsageInput, coerce_quantity, coerce_rate};
use bigdecimal::BigDecimal;
use csv::StringRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;

static EXPECTED_HEADERS: LazyLock<StringRecord> = LazyLock::new(|| {
    StringRecord::from(vec![
        "TENANT",
        "PEAK (kWh)",
        "OFF-PEAK (kWh)",
        "TOTAL (kWh)",
        "MAX DEMAND (kW)",
        "FUEL RATE",
    ])
});

/// One tenant's usage from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub tenant: String,
    pub usage: UsageInput,
}

/// Priced batch, in file order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub bills: Vec<(BatchEntry, ChargeBreakdown)>,
    /// Sum of every bill's grand total.
    pub total: BigDecimal,
}

pub fn read_batch(path: &Path) -> Result<Vec<BatchEntry>, BillError> {
    let file = File::open(path).map_err(|e| BillError::io(path, e))?;
    parse_batch(path, BufReader::new(file))
}

/// Parses batch usage rows read from `source`. Lines before the `TENANT,` header row are
/// ignored, as is a byte order mark in front of it.
pub fn parse_batch(
    source: &Path,
    mut reader: impl BufRead,
) -> Result<Vec<BatchEntry>, BillError> {
    let mut line_buf = String::new();
    let header_line = loop {
        line_buf.clear();
        let read = reader
            .read_line(&mut line_buf)
            .map_err(|e| BillError::io(source, e))?;
        if read == 0 {
            return Err(BillError::MissingHeader);
        }
        let line = line_buf.trim_start_matches('\u{feff}');
        if line.starts_with("TENANT,") {
            break line.to_string();
        }
    };
    let reader_with_headers = Cursor::new(header_line).chain(reader);
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader_with_headers);
    let headers = csv_reader.headers()?.clone();
    if headers != *EXPECTED_HEADERS {
        return Err(BillError::UnexpectedHeaders {
            found: headers.iter().map(str::to_string).collect(),
            expected: EXPECTED_HEADERS.iter().map(str::to_string).collect(),
        });
    }

    let mut entries = Vec::new();
    for record in csv_reader.into_records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");
        entries.push(BatchEntry {
            tenant: field(0).to_string(),
            usage: UsageInput {
                peak: coerce_quantity(field(1)),
                off_peak: coerce_quantity(field(2)),
                total: coerce_quantity(field(3)),
                max_demand: coerce_quantity(field(4)),
                fuel_adjustment_rate: coerce_rate(field(5)),
            },
        });
    }
    tracing::debug!(count = entries.len(), "read batch entries");
    Ok(entries)
}

pub fn price_batch(entries: Vec<BatchEntry>, rates: &RateTable) -> BatchReport {
    let bills: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let bill = compute_charges(&entry.usage, rates);
            (entry, bill)
        })
        .collect();
    let total = bills.iter().map(|(_, bill)| &bill.grand_total).sum();
    BatchReport { bills, total }
}
