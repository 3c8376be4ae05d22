//! Weekly schedules: back-to-back seven-day windows.

use crate::calendar::{BusinessCalendar, add_days};
use crate::error::ScheduleResult;
use crate::models::{Covenant, ScheduleEntry, Transaction};

const DAYS_PER_WEEK: u64 = 7;

/// Generates one entry per seven-day window starting at the transaction start.
///
/// Window `n` covers `start + 7n ..= start + 7n + 6` and falls due on the day
/// after it closes, business-day adjusted. Generation stops at the first
/// adjusted due date after the transaction end date.
pub fn generate_weekly(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    let end = transaction.end_date;
    let mut entries = Vec::new();
    let mut index: u32 = 1;
    let mut period_start = transaction.start_date;

    while period_start < end {
        let next_period_start = add_days(period_start, DAYS_PER_WEEK)?;
        let due_date = calendar.adjust(next_period_start)?;
        if due_date > end {
            break;
        }

        let period_end = add_days(period_start, DAYS_PER_WEEK - 1)?;
        entries.push(ScheduleEntry::pending(
            &covenant.covenant_id,
            index,
            due_date,
            period_start,
            period_end,
        ));
        index += 1;
        period_start = next_period_start;
    }

    Ok(entries)
}
