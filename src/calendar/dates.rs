//! Calendar arithmetic helpers.
//!
//! All helpers return [`ScheduleError::DateOutOfRange`] instead of panicking
//! when arithmetic leaves the range `chrono` can represent.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{ScheduleError, ScheduleResult};

/// Adds `days` calendar days.
pub fn add_days(date: NaiveDate, days: u64) -> ScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or(ScheduleError::DateOutOfRange { date })
}

/// Adds `months` calendar months, clamping the day to the target month's end.
///
/// # Example
///
/// ```
/// use covenant_schedule::calendar::add_months;
/// use chrono::NaiveDate;
///
/// let jan_31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// assert_eq!(add_months(jan_31, 1).unwrap(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
/// ```
pub fn add_months(date: NaiveDate, months: u32) -> ScheduleResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(ScheduleError::DateOutOfRange { date })
}

/// The last day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> ScheduleResult<NaiveDate> {
    let first = date.with_day(1).ok_or(ScheduleError::DateOutOfRange { date })?;
    add_months(first, 1)?
        .pred_opt()
        .ok_or(ScheduleError::DateOutOfRange { date })
}

/// Returns true if `date` is the last day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

/// Moves `date` to `day` within the same month, or to the month's last day
/// when that month is too short.
pub fn with_day_or_month_end(date: NaiveDate, day: u32) -> ScheduleResult<NaiveDate> {
    match date.with_day(day) {
        Some(moved) => Ok(moved),
        None => last_day_of_month(date),
    }
}

/// The last day of February in the year of `date`: the 29th in leap years,
/// the 28th otherwise.
pub fn february_end(date: NaiveDate) -> ScheduleResult<NaiveDate> {
    let february = date
        .with_day(1)
        .and_then(|first| first.with_month(2))
        .ok_or(ScheduleError::DateOutOfRange { date })?;
    last_day_of_month(february)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(make_date("2025-01-31"), 1).unwrap(), make_date("2025-02-28"));
        assert_eq!(add_months(make_date("2024-01-31"), 1).unwrap(), make_date("2024-02-29"));
        assert_eq!(add_months(make_date("2025-03-31"), 3).unwrap(), make_date("2025-06-30"));
    }

    #[test]
    fn test_add_months_across_years() {
        assert_eq!(add_months(make_date("2024-02-29"), 12).unwrap(), make_date("2025-02-28"));
        assert_eq!(add_months(make_date("2024-02-29"), 48).unwrap(), make_date("2028-02-29"));
    }

    #[test]
    fn test_add_days_overflow_is_error() {
        assert!(matches!(
            add_days(NaiveDate::MAX, 1),
            Err(ScheduleError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(make_date("2025-02-10")).unwrap(), make_date("2025-02-28"));
        assert_eq!(last_day_of_month(make_date("2024-02-10")).unwrap(), make_date("2024-02-29"));
        assert_eq!(last_day_of_month(make_date("2025-04-01")).unwrap(), make_date("2025-04-30"));
        assert_eq!(last_day_of_month(make_date("2025-12-31")).unwrap(), make_date("2025-12-31"));
    }

    #[test]
    fn test_is_last_day_of_month() {
        assert!(is_last_day_of_month(make_date("2025-03-31")));
        assert!(is_last_day_of_month(make_date("2024-02-29")));
        assert!(is_last_day_of_month(make_date("2025-02-28")));
        assert!(!is_last_day_of_month(make_date("2024-02-28")));
        assert!(!is_last_day_of_month(make_date("2025-01-15")));
    }

    #[test]
    fn test_with_day_or_month_end() {
        assert_eq!(
            with_day_or_month_end(make_date("2025-04-01"), 31).unwrap(),
            make_date("2025-04-30")
        );
        assert_eq!(
            with_day_or_month_end(make_date("2025-05-01"), 31).unwrap(),
            make_date("2025-05-31")
        );
        assert_eq!(
            with_day_or_month_end(make_date("2025-02-01"), 15).unwrap(),
            make_date("2025-02-15")
        );
    }

    #[test]
    fn test_february_end() {
        assert_eq!(february_end(make_date("2024-03-31")).unwrap(), make_date("2024-02-29"));
        assert_eq!(february_end(make_date("2025-03-31")).unwrap(), make_date("2025-02-28"));
        assert_eq!(february_end(make_date("2100-12-01")).unwrap(), make_date("2100-02-28"));
        assert_eq!(february_end(make_date("2000-01-31")).unwrap(), make_date("2000-02-29"));
    }
}
