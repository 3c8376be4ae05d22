//! Transaction model and its wire form.
//!
//! A [`Transaction`] bounds the life of every covenant attached to it. The
//! [`TransactionInput`] form carries raw string fields as they arrive from
//! JSON or storage and converts into a [`Transaction`] through a validating
//! `TryFrom`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

use super::DATE_FORMAT;

/// A financed transaction with a fixed date range.
///
/// # Example
///
/// ```
/// use covenant_schedule::models::Transaction;
/// use chrono::NaiveDate;
///
/// let transaction = Transaction {
///     transaction_id: "TXN-001".to_string(),
///     name: "Corporate Credit Facility".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
/// };
///
/// assert_eq!(transaction.duration_days(), 730);
/// assert!(transaction.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction.
    pub transaction_id: String,
    /// Human-readable name of the transaction.
    pub name: String,
    /// The first day of the transaction (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the transaction (inclusive).
    pub end_date: NaiveDate,
}

impl Transaction {
    /// Checks the invariants that typed construction cannot guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTransaction`] when the identifier is
    /// blank or when `start_date` is after `end_date`.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.transaction_id.trim().is_empty() {
            return Err(ScheduleError::InvalidTransaction {
                field: "transaction_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.start_date > self.end_date {
            return Err(ScheduleError::InvalidTransaction {
                field: "start_date".to_string(),
                message: format!(
                    "start_date {} must be before or equal to end_date {}",
                    self.start_date, self.end_date
                ),
            });
        }

        Ok(())
    }

    /// Number of calendar days between the start and end dates.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Raw transaction fields as received at the boundary.
///
/// Every field is optional so that a missing field can be reported by name
/// instead of surfacing as a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Unique identifier for the transaction.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Human-readable name of the transaction.
    #[serde(default)]
    pub name: Option<String>,
    /// Start date as `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// End date as `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
}

impl TryFrom<TransactionInput> for Transaction {
    type Error = ScheduleError;

    fn try_from(input: TransactionInput) -> ScheduleResult<Self> {
        let transaction = Transaction {
            transaction_id: required("transaction_id", input.transaction_id)?,
            name: required("name", input.name)?,
            start_date: parse_date("start_date", input.start_date)?,
            end_date: parse_date("end_date", input.end_date)?,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

fn required(field: &str, value: Option<String>) -> ScheduleResult<String> {
    value.ok_or_else(|| ScheduleError::InvalidTransaction {
        field: field.to_string(),
        message: "missing required field".to_string(),
    })
}

fn parse_date(field: &str, value: Option<String>) -> ScheduleResult<NaiveDate> {
    let raw = required(field, value)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| ScheduleError::InvalidTransaction {
        field: field.to_string(),
        message: format!("must be in YYYY-MM-DD format, got '{}'", raw),
    })
}
