//! Schedule entries and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a schedule entry.
///
/// The generator only ever produces [`ScheduleStatus::Pending`]; the other
/// states are reached through the persistence layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Not yet delivered.
    #[default]
    Pending,
    /// Delivered.
    Completed,
    /// Past its due date without delivery.
    Overdue,
    /// No longer required.
    Cancelled,
}

/// A status string outside the closed status set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schedule status: {0}")]
pub struct InvalidStatus(pub String);

impl ScheduleStatus {
    /// Canonical name as stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Overdue => "overdue",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScheduleStatus::Pending),
            "completed" => Ok(ScheduleStatus::Completed),
            "overdue" => Ok(ScheduleStatus::Overdue),
            "cancelled" => Ok(ScheduleStatus::Cancelled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Builds the identifier for the `index`-th entry of a covenant.
///
/// # Example
///
/// ```
/// use covenant_schedule::models::schedule_id;
///
/// assert_eq!(schedule_id("COV-001", 7), "SCH-COV-001-007");
/// ```
pub fn schedule_id(covenant_id: &str, index: u32) -> String {
    format!("SCH-{}-{:03}", covenant_id, index)
}

/// One concrete due-date occurrence of a covenant.
///
/// # Example
///
/// ```
/// use covenant_schedule::models::{ScheduleEntry, ScheduleStatus};
/// use chrono::NaiveDate;
///
/// let entry = ScheduleEntry::pending(
///     "COV-001",
///     1,
///     NaiveDate::from_ymd_opt(2025, 2, 17).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
/// );
///
/// assert_eq!(entry.schedule_id, "SCH-COV-001-001");
/// assert_eq!(entry.status, ScheduleStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// `SCH-<covenant_id>-<NNN>`.
    pub schedule_id: String,
    /// The covenant this entry belongs to.
    pub covenant_id: String,
    /// Business-day adjusted due date.
    pub due_date: NaiveDate,
    /// Lifecycle status.
    pub status: ScheduleStatus,
    /// First day covered by the obligation.
    pub period_start: NaiveDate,
    /// Last day covered by the obligation.
    pub period_end: NaiveDate,
}

impl ScheduleEntry {
    /// Creates a pending entry for the `index`-th occurrence of a covenant.
    pub fn pending(
        covenant_id: &str,
        index: u32,
        due_date: NaiveDate,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        ScheduleEntry {
            schedule_id: schedule_id(covenant_id, index),
            covenant_id: covenant_id.to_string(),
            due_date,
            status: ScheduleStatus::Pending,
            period_start,
            period_end,
        }
    }
}
