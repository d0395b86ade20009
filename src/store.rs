use crate::billing_period::BillingPeriod;
use crate::error::BillError;
use crate::rate_calculator::ChargeBreakdown;
use crate::render::format_amount;
use crate::usage_data::UsageInput;
use bigdecimal::BigDecimal;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Who and what a bill is for. None of it affects the charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillMetadata {
    pub tenant_name: String,
    pub premise_address: String,
    pub bill_date: String,
    pub account_number: String,
    pub meter_number: String,
    pub period: Option<BillingPeriod>,
}

/// A saved bill: its metadata, the usage it was priced on, and the displayed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub id: String,
    #[serde(flatten)]
    pub metadata: BillMetadata,
    pub peak_usage: BigDecimal,
    pub off_peak_usage: BigDecimal,
    pub total_usage: BigDecimal,
    pub max_demand: BigDecimal,
    pub total_amount: String,
    pub timestamp: Timestamp,
}

impl BillRecord {
    pub fn new(metadata: BillMetadata, usage: &UsageInput, bill: &ChargeBreakdown) -> Self {
        Self {
            id: Self::new_id(),
            metadata,
            peak_usage: usage.peak.clone(),
            off_peak_usage: usage.off_peak.clone(),
            total_usage: usage.total.clone(),
            max_demand: usage.max_demand.clone(),
            total_amount: format_amount(&bill.grand_total),
            timestamp: Timestamp::now(),
        }
    }

    /// Generates an id of the form `bill-<unix millis>`.
    pub fn new_id() -> String {
        format!("bill-{}", Timestamp::now().as_millisecond())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// JSON file holding an array of [`BillRecord`]s, keyed by id.
#[derive(Debug, Clone)]
pub struct BillStore {
    path: PathBuf,
}

impl BillStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every saved bill. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<BillRecord>, BillError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BillError::io(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        if !value.is_array() {
            tracing::warn!(
                path = %self.path.display(),
                "bill store does not hold an array, starting fresh"
            );
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Saves `record`, replacing any bill with the same id.
    pub fn upsert(&self, record: BillRecord) -> Result<UpsertOutcome, BillError> {
        let mut bills = self.load()?;
        let outcome = match bills.iter_mut().find(|bill| bill.id == record.id) {
            Some(existing) => {
                *existing = record;
                UpsertOutcome::Replaced
            }
            None => {
                bills.push(record);
                UpsertOutcome::Inserted
            }
        };
        let json = serde_json::to_string_pretty(&bills)?;
        fs::write(&self.path, json).map_err(|e| BillError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), count = bills.len(), ?outcome, "saved bills");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_calculator::compute_charges;
    use crate::rates::RateTable;
    use jiff::civil::date;

    fn sample_record(id: &str, tenant: &str) -> BillRecord {
        let usage = UsageInput {
            peak: BigDecimal::from(100),
            off_peak: BigDecimal::from(50),
            total: BigDecimal::from(150),
            max_demand: BigDecimal::from(10),
            fuel_adjustment_rate: None,
        };
        let bill = compute_charges(&usage, &RateTable::default());
        let metadata = BillMetadata {
            tenant_name: tenant.to_string(),
            period: Some(BillingPeriod::new(date(2025, 7, 1), date(2025, 7, 31))),
            ..Default::default()
        };
        BillRecord {
            id: id.to_string(),
            ..BillRecord::new(metadata, &usage, &bill)
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = BillStore::new(dir.path().join("bills.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn upsert_appends_new_and_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = BillStore::new(dir.path().join("bills.json"));

        assert_eq!(store.upsert(sample_record("bill-1", "A")).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert(sample_record("bill-2", "B")).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert(sample_record("bill-1", "C")).unwrap(), UpsertOutcome::Replaced);

        let bills = store.load().unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].id, "bill-1");
        assert_eq!(bills[0].metadata.tenant_name, "C");
        assert_eq!(bills[0].total_amount, "1128.60");
        assert_eq!(bills[1].metadata.tenant_name, "B");
    }

    #[test]
    fn non_array_store_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bills.json");
        fs::write(&path, r#"{"not": "a list"}"#).unwrap();
        let store = BillStore::new(&path);
        assert!(store.load().unwrap().is_empty());
        store.upsert(sample_record("bill-1", "A")).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bills.json");
        fs::write(&path, "[{").unwrap();
        assert!(matches!(BillStore::new(&path).load(), Err(BillError::Json(_))));
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = BillRecord::new_id();
        let millis = id.strip_prefix("bill-").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }
}
