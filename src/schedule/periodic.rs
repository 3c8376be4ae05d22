//! Calendar-month schedules: monthly, quarterly and annual covenants.
//!
//! Periods chain from the transaction start date: each period starts where
//! the previous one ended, stepped by whole calendar months. A day clamped
//! in a short month carries into the periods after it, while due dates keep
//! following the start date's day-of-month.
//!
//! Due-date day-of-month policy:
//! - a start on the last day of its month keeps every due date on month end
//! - otherwise the start's day is reused, clamped to the target month's end
//! - an annual covenant starting on February 29 falls due on February 29 in
//!   leap years and February 28 otherwise
//! - a month-end quarterly covenant whose next period lands in March also
//!   falls due on the last day of February of that year

use chrono::{Datelike, NaiveDate};
use tracing::trace;

use crate::calendar::{
    BusinessCalendar, add_months, february_end, is_last_day_of_month, last_day_of_month,
    with_day_or_month_end,
};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Covenant, Frequency, ScheduleEntry, Transaction};

/// Anchoring rules derived once from the transaction start date.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    start: NaiveDate,
    months: u32,
    month_end: bool,
    leap_day: bool,
}

impl Anchor {
    fn new(start: NaiveDate, months: u32) -> Self {
        Self {
            start,
            months,
            month_end: is_last_day_of_month(start),
            leap_day: months == 12 && start.month() == 2 && start.day() == 29,
        }
    }

    fn due_date(&self, next_period_start: NaiveDate) -> ScheduleResult<NaiveDate> {
        if self.leap_day {
            february_end(next_period_start)
        } else if self.month_end {
            last_day_of_month(next_period_start)
        } else {
            with_day_or_month_end(next_period_start, self.start.day())
        }
    }

    fn february_extra(&self, next_period_start: NaiveDate) -> bool {
        self.months == 3 && self.month_end && next_period_start.month() == 3
    }
}

/// Generates entries for a calendar-month `frequency`.
///
/// The loop stops at the first period whose unadjusted due date is after the
/// transaction end date; a due date equal to the end date is still emitted.
///
/// # Errors
///
/// Returns [`ScheduleError::UnsupportedFrequency`] for daily and weekly
/// frequencies. Propagates [`ScheduleError::BusinessDayNotFound`] from
/// adjustment and [`ScheduleError::DateOutOfRange`] from month arithmetic.
pub fn generate_periodic(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
    frequency: Frequency,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    let months = frequency
        .period_months()
        .ok_or_else(|| ScheduleError::UnsupportedFrequency {
            frequency: frequency.to_string(),
        })?;

    let end = transaction.end_date;
    let anchor = Anchor::new(transaction.start_date, months);

    let mut entries = Vec::new();
    let mut index: u32 = 1;
    let mut period_start = anchor.start;

    loop {
        let next_period_start = add_months(period_start, months)?;
        let period_end = next_period_start
            .pred_opt()
            .ok_or(ScheduleError::DateOutOfRange {
                date: next_period_start,
            })?;
        let due_date = anchor.due_date(next_period_start)?;

        if anchor.february_extra(next_period_start) {
            let february_due = calendar.adjust(february_end(next_period_start)?)?;
            if february_due <= end {
                trace!(
                    covenant_id = %covenant.covenant_id,
                    due_date = %february_due,
                    "Adding February quarter-end entry"
                );
                entries.push(ScheduleEntry::pending(
                    &covenant.covenant_id,
                    index,
                    february_due,
                    period_start,
                    february_due,
                ));
                index += 1;
            }
        }

        if due_date > end {
            break;
        }

        entries.push(ScheduleEntry::pending(
            &covenant.covenant_id,
            index,
            calendar.adjust(due_date)?,
            period_start,
            period_end,
        ));
        index += 1;
        period_start = next_period_start;
    }

    Ok(entries)
}

/// Monthly covenants: one-month periods.
pub fn generate_monthly(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    generate_periodic(calendar, transaction, covenant, Frequency::Monthly)
}

/// Quarterly covenants: three-month periods.
pub fn generate_quarterly(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    generate_periodic(calendar, transaction, covenant, Frequency::Quarterly)
}

/// Annual covenants: twelve-month periods.
pub fn generate_annually(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    generate_periodic(calendar, transaction, covenant, Frequency::Annually)
}
