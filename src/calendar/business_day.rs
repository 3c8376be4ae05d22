//! Business-day detection and due-date adjustment.
//!
//! A business day is Monday through Friday and not a holiday. Due dates that
//! land on any other day are moved to the nearest business day in the
//! configured [`AdjustmentDirection`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Upper bound on the number of days `adjust` will step before giving up.
pub const MAX_ADJUSTMENT_STEPS: u32 = 10;

/// Direction in which non-business due dates are moved.
///
/// # Example
///
/// ```
/// use covenant_schedule::calendar::AdjustmentDirection;
///
/// assert_eq!("backward".parse::<AdjustmentDirection>().unwrap(), AdjustmentDirection::Backward);
/// assert_eq!(AdjustmentDirection::default(), AdjustmentDirection::Forward);
/// assert!("sideways".parse::<AdjustmentDirection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AdjustmentDirection {
    /// Move to the next business day.
    #[default]
    Forward,
    /// Move to the previous business day.
    Backward,
}

impl AdjustmentDirection {
    /// Canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentDirection::Forward => "forward",
            AdjustmentDirection::Backward => "backward",
        }
    }

    fn step(self, date: NaiveDate) -> ScheduleResult<NaiveDate> {
        let stepped = match self {
            AdjustmentDirection::Forward => date.succ_opt(),
            AdjustmentDirection::Backward => date.pred_opt(),
        };
        stepped.ok_or(ScheduleError::DateOutOfRange { date })
    }
}

impl fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentDirection {
    type Err = ScheduleError;

    fn from_str(s: &str) -> ScheduleResult<Self> {
        match s {
            "forward" => Ok(AdjustmentDirection::Forward),
            "backward" => Ok(AdjustmentDirection::Backward),
            other => Err(ScheduleError::InvalidAdjustment {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for AdjustmentDirection {
    type Error = ScheduleError;

    fn try_from(value: String) -> ScheduleResult<Self> {
        value.parse()
    }
}

impl From<AdjustmentDirection> for String {
    fn from(direction: AdjustmentDirection) -> Self {
        direction.as_str().to_string()
    }
}

/// Returns true for Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A holiday set paired with an adjustment direction.
///
/// The calendar owns its holiday set and never mutates it after
/// construction, so a single instance can be shared read-only.
///
/// # Example
///
/// ```
/// use covenant_schedule::calendar::{AdjustmentDirection, BusinessCalendar};
/// use chrono::NaiveDate;
///
/// let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
/// let calendar = BusinessCalendar::new([christmas], AdjustmentDirection::Forward);
///
/// assert!(!calendar.is_business_day(christmas));
/// // Thursday holiday rolls to Friday
/// assert_eq!(
///     calendar.adjust(christmas).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
    direction: AdjustmentDirection,
}

impl BusinessCalendar {
    /// Creates a calendar from a holiday list and an adjustment direction.
    pub fn new(
        holidays: impl IntoIterator<Item = NaiveDate>,
        direction: AdjustmentDirection,
    ) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            direction,
        }
    }

    /// The configured holidays, in date order.
    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// The configured adjustment direction.
    pub fn direction(&self) -> AdjustmentDirection {
        self.direction
    }

    /// Returns true if `date` is in the holiday set.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Returns true if `date` is a weekday and not a holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// Moves `date` to the nearest business day in the configured direction.
    ///
    /// Business days are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::BusinessDayNotFound`] when no business day
    /// exists within [`MAX_ADJUSTMENT_STEPS`] days, which happens only when
    /// the holiday set covers whole weeks.
    pub fn adjust(&self, date: NaiveDate) -> ScheduleResult<NaiveDate> {
        if self.is_business_day(date) {
            return Ok(date);
        }

        let mut candidate = date;
        for _ in 0..MAX_ADJUSTMENT_STEPS {
            candidate = self.direction.step(candidate)?;
            if self.is_business_day(candidate) {
                return Ok(candidate);
            }
        }

        Err(ScheduleError::BusinessDayNotFound {
            date,
            steps: MAX_ADJUSTMENT_STEPS,
        })
    }
}
