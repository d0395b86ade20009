//! Electricity bill calculator.
//!
//! [`compute_charges`] prices metered usage against a [`RateTable`] and settles the total on a
//! 5-cent denomination via [`rounding_adjustment`]. The remaining modules cover input coercion,
//! display formatting, batch files, and saved bills.

pub mod batch;
pub mod billing_period;
pub mod error;
pub mod rate_calculator;
pub mod rates;
pub mod render;
pub mod rounding;
pub mod store;
pub mod usage_data;

pub use error::BillError;
pub use rate_calculator::{ChargeBreakdown, compute_charges};
pub use rates::{RateOverrides, RateTable};
pub use rounding::{RoundingAdjustment, rounding_adjustment};
pub use usage_data::{UsageInput, coerce_quantity};
