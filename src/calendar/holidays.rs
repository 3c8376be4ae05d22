//! Holiday calendar providers.
//!
//! A [`HolidayProvider`] turns a country code and a list of years into a set
//! of non-business dates. The generator treats every provider failure as an
//! empty calendar, so implementations are free to return errors for unknown
//! countries or unreadable sources.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::load_yaml;
use crate::error::{ScheduleError, ScheduleResult};

/// A named holiday on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Republic Day").
    pub name: String,
}

/// On-disk layout of `holidays/<COUNTRY>.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendarFile {
    /// Country code the file describes.
    pub country: String,
    /// Every known holiday for the country, any years.
    pub holidays: Vec<HolidayRecord>,
}

/// Source of holiday dates by country and year.
pub trait HolidayProvider {
    /// Returns every holiday for `country` falling in one of `years`.
    fn holidays(&self, country: &str, years: &[i32]) -> ScheduleResult<BTreeSet<NaiveDate>>;
}

fn select_years(records: &[HolidayRecord], years: &[i32]) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .map(|record| record.date)
        .filter(|date| years.contains(&date.year()))
        .collect()
}

/// In-memory provider keyed by upper-case country code.
///
/// # Example
///
/// ```
/// use covenant_schedule::calendar::{HolidayProvider, HolidayRecord, StaticHolidayProvider};
/// use chrono::NaiveDate;
///
/// let provider = StaticHolidayProvider::new().with_calendar(
///     "in",
///     vec![HolidayRecord {
///         date: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
///         name: "Republic Day".to_string(),
///     }],
/// );
///
/// let holidays = provider.holidays("IN", &[2025]).unwrap();
/// assert_eq!(holidays.len(), 1);
/// assert!(provider.holidays("IN", &[2026]).unwrap().is_empty());
/// assert!(provider.holidays("XX", &[2025]).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayProvider {
    calendars: HashMap<String, Vec<HolidayRecord>>,
}

impl StaticHolidayProvider {
    /// Creates a provider with no calendars.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the holidays for a country, replacing any previous entry.
    pub fn with_calendar(mut self, country: &str, holidays: Vec<HolidayRecord>) -> Self {
        self.calendars.insert(country.to_uppercase(), holidays);
        self
    }
}

impl HolidayProvider for StaticHolidayProvider {
    fn holidays(&self, country: &str, years: &[i32]) -> ScheduleResult<BTreeSet<NaiveDate>> {
        self.calendars
            .get(&country.to_uppercase())
            .map(|records| select_years(records, years))
            .ok_or_else(|| ScheduleError::HolidayCalendar {
                country: country.to_string(),
                message: "no calendar registered".to_string(),
            })
    }
}

/// Provider reading one YAML file per country from a directory.
///
/// ```text
/// config/holidays/
/// ├── IN.yaml
/// └── US.yaml
/// ```
#[derive(Debug, Clone)]
pub struct YamlHolidayProvider {
    dir: PathBuf,
}

impl YamlHolidayProvider {
    /// Creates a provider rooted at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The file that holds `country`'s calendar.
    pub fn calendar_path(&self, country: &str) -> PathBuf {
        self.dir.join(format!("{}.yaml", country.to_uppercase()))
    }
}

impl HolidayProvider for YamlHolidayProvider {
    fn holidays(&self, country: &str, years: &[i32]) -> ScheduleResult<BTreeSet<NaiveDate>> {
        let file: HolidayCalendarFile = load_yaml(&self.calendar_path(country))?;

        if !file.country.eq_ignore_ascii_case(country) {
            return Err(ScheduleError::HolidayCalendar {
                country: country.to_string(),
                message: format!("calendar file describes '{}'", file.country),
            });
        }

        Ok(select_years(&file.holidays, years))
    }
}
