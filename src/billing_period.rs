use crate::error::BillError;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of dates a bill covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: Date,
    pub end: Date,
}

impl BillingPeriod {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Parses a period from two ISO 8601 dates (`YYYY-MM-DD`).
    pub fn parse(start: &str, end: &str) -> Result<Self, BillError> {
        let parse = |raw: &str| {
            raw.trim().parse::<Date>().map_err(|source| BillError::InvalidDate {
                input: raw.to_string(),
                source,
            })
        };
        Ok(Self::new(parse(start)?, parse(end)?))
    }

    /// Number of days billed, counting both endpoints. Order of the endpoints does not matter.
    pub fn days(&self) -> i64 {
        let span = self.end - self.start;
        i64::from(span.get_days()).abs() + 1
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} days)",
            self.start.strftime("%d.%m.%Y"),
            self.end.strftime("%d.%m.%Y"),
            self.days()
        )
    }
}
