//! Configuration types for the schedule generator.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `generator.yaml`.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calendar::AdjustmentDirection;

/// Country calendar lookup for the holiday provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarSpec {
    /// Country code (e.g., "IN").
    pub country: String,
    /// Years whose holidays are loaded. Required; there is no default year.
    pub years: Vec<i32>,
}

/// Where a generator's holidays come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidaySource {
    /// An explicit list of dates.
    Explicit(Vec<NaiveDate>),
    /// A provider lookup.
    Calendar(CalendarSpec),
    /// No holidays; only weekends are non-business days.
    None,
}

/// Contents of `generator.yaml`.
///
/// ```yaml
/// business_day_adjustment: forward
/// holidays: [2025-12-25, 2026-01-01]
/// calendar:
///   country: IN
///   years: [2025, 2026]
/// database_path: schedules.db
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorConfig {
    /// Adjustment direction; `forward` when omitted.
    #[serde(default)]
    pub business_day_adjustment: AdjustmentDirection,
    /// Explicit holiday dates. Takes precedence over `calendar`.
    #[serde(default)]
    pub holidays: Option<Vec<NaiveDate>>,
    /// Provider lookup used when no explicit holidays are given.
    #[serde(default)]
    pub calendar: Option<CalendarSpec>,
    /// SQLite database file, relative to the configuration directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Resolves which holiday source applies.
    pub fn holiday_source(&self) -> HolidaySource {
        match (&self.holidays, &self.calendar) {
            (Some(dates), _) => HolidaySource::Explicit(dates.clone()),
            (None, Some(lookup)) => HolidaySource::Calendar(lookup.clone()),
            (None, None) => HolidaySource::None,
        }
    }
}
